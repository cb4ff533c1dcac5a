//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// Other braces (e.g. JSON examples inside a prompt) are left untouched.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Log-safe truncation for large strings, cut on a char boundary.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut end = max;
  while !s.is_char_boundary(end) {
    end -= 1;
  }
  format!("{}… ({} bytes total)", &s[..end], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fill_template_leaves_json_braces() {
    let out = fill_template("A {x} {\"k\": 1} {x}", &[("x", "y")]);
    assert_eq!(out, "A y {\"k\": 1} y");
  }

  #[test]
  fn test_trunc_for_log_short() {
    assert_eq!(trunc_for_log("hello", 10), "hello");
  }

  #[test]
  fn test_trunc_for_log_multibyte_safe() {
    let out = trunc_for_log("hé世界!", 3);
    assert!(out.starts_with("hé"));
    assert!(out.ends_with("(10 bytes total)"));
  }
}
