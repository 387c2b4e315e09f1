//! Positional format-argument substitution.
//!
//! Pushed translations arrive as raw templates (`"Hello, %s"`,
//! `"%2$s of %1$s"`). Subjects that were created with format arguments
//! re-render the template with the same arguments.

/// Substitute `%s`, `%d`, `%N$s`, `%N$d` and `%%` in `template`.
///
/// Sequential specifiers consume `args` left to right; positional ones are
/// 1-based and do not advance the sequence. Specifiers without a matching
/// argument, and unknown conversions, are left verbatim. With no arguments
/// the template is returned unchanged.
pub fn format_with_args(template: &str, args: &[String]) -> String {
    if args.is_empty() {
        return template.to_owned();
    }

    let mut out = String::with_capacity(template.len());
    let mut next = 0usize;
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('%') {
            out.push('%');
            rest = tail;
            continue;
        }

        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        let positional = digits > 0 && after[digits..].starts_with('$');
        let conv_at = if positional { digits + 1 } else { 0 };

        if !matches!(after.as_bytes().get(conv_at), Some(b's' | b'd')) {
            out.push('%');
            rest = after;
            continue;
        }

        let index = if positional {
            after[..digits]
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
        } else {
            next += 1;
            Some(next - 1)
        };

        match index.and_then(|i| args.get(i)) {
            Some(arg) => out.push_str(arg),
            None => {
                out.push('%');
                out.push_str(&after[..=conv_at]);
            }
        }
        rest = &after[conv_at + 1..];
    }

    out.push_str(rest);
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn no_args_returns_template() {
        assert_eq!(format_with_args("100%% %s", &[]), "100%% %s");
    }

    #[test]
    fn sequential() {
        assert_eq!(
            format_with_args("%s bought %d apples", &args(&["Bo", "4"])),
            "Bo bought 4 apples"
        );
    }

    #[test]
    fn sequential_and_positional_share_args() {
        let a = args(&["Ana", "3"]);
        assert_eq!(format_with_args("%s has %d", &a), "Ana has 3");
        assert_eq!(format_with_args("%2$s/%1$s", &a), "3/Ana");
    }

    #[test]
    fn positional_does_not_advance_sequence() {
        assert_eq!(
            format_with_args("%2$s then %s", &args(&["a", "b"])),
            "b then a"
        );
    }

    #[test]
    fn escaped_percent() {
        assert_eq!(format_with_args("%s: 50%%", &args(&["sale"])), "sale: 50%");
    }

    #[test]
    fn missing_argument_left_verbatim() {
        assert_eq!(format_with_args("%s and %s", &args(&["one"])), "one and %s");
        assert_eq!(format_with_args("%3$s", &args(&["one"])), "%3$s");
        assert_eq!(format_with_args("%0$s", &args(&["one"])), "%0$s");
    }

    #[test]
    fn unknown_conversion_left_verbatim() {
        assert_eq!(format_with_args("%f %s", &args(&["x"])), "%f x");
    }

    #[test]
    fn trailing_percent() {
        assert_eq!(format_with_args("%s%", &args(&["x"])), "x%");
    }

    #[test]
    fn multibyte_text_preserved() {
        assert_eq!(format_with_args("¡%s — ok!", &args(&["hola"])), "¡hola — ok!");
    }

    proptest! {
        #[test]
        fn templates_without_percent_are_identity(s in "[^%]*", a in "[a-z]{0,5}") {
            prop_assert_eq!(format_with_args(&s, &[a]), s);
        }
    }
}
