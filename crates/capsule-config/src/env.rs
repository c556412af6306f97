use std::sync::OnceLock;

use regex::Regex;

/// Expand `{{ env.VAR }}` placeholders in a raw TOML string
///
/// An optional fallback can be given as `{{ env.VAR | default("value") }}`;
/// it is used when the variable is unset. A placeholder with no default
/// referring to an unset variable is an error. TOML comment lines are
/// passed through untouched.
pub fn expand_env(input: &str) -> anyhow::Result<String> {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let placeholder = PLACEHOLDER.get_or_init(|| {
        // Group 1: variable name, group 2: optional default value
        Regex::new(r#"\{\{\s*env\.([A-Za-z0-9_]+)\s*(?:\|\s*default\("([^"]*)"\)\s*)?\}\}"#)
            .expect("must be valid regex")
    });

    let mut output = String::with_capacity(input.len());

    for line in input.split_inclusive('\n') {
        if line.trim_start().starts_with('#') {
            output.push_str(line);
            continue;
        }

        let mut last_end = 0;
        for captures in placeholder.captures_iter(line) {
            let span = captures.get(0).expect("capture 0 always present");
            let var_name = &captures[1];
            output.push_str(&line[last_end..span.start()]);

            match std::env::var(var_name) {
                Ok(value) => output.push_str(&value),
                Err(_) => match captures.get(2) {
                    Some(default) => output.push_str(default.as_str()),
                    None => anyhow::bail!("environment variable not found: `{var_name}`"),
                },
            }

            last_end = span.end();
        }
        output.push_str(&line[last_end..]);
    }

    Ok(output)
}
