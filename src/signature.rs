//! Signature parser for `name({a}, {b} [, {c}]) doc…` prefixes.

use crate::model::{Param, Signature};
use regex::Regex;
use std::sync::LazyLock;

/// Same name class as the default segment patterns: a Unicode word
/// character that is not a digit, then word characters, `.`, `#` or `:`.
pub(crate) const NAME_PATTERN: &str = r"[^\W\d][\w.#:]*";

static RE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{NAME_PATTERN}\(")).unwrap());

static RE_PARAM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").unwrap());

/// Parse the signature at the start of `text`.
///
/// Returns `None` when `text` does not open with a dotted name directly
/// followed by a balanced parenthesized group. Parameters are the `{name}`
/// placeholders inside the group; those after the first `[` are optional.
/// Bracket nesting and placement are not validated.
///
/// The doc is the rest of the signature line with leading blanks removed,
/// followed by the remaining lines untouched so their indentation survives.
/// Trailing whitespace is dropped.
pub fn parse_signature(text: &str) -> Option<Signature> {
    let prefix = RE_NAME.find(text)?;
    let open = prefix.end() - 1;
    let close = matching_paren(text, open)?;

    let name = &text[..open];
    let sig = &text[open..=close];
    let doc = text[close + 1..]
        .trim_start_matches([' ', '\t'])
        .trim_end();

    let bracket = sig.find('[');
    let params = RE_PARAM
        .captures_iter(sig)
        .filter_map(|caps| {
            let (whole, param) = (caps.get(0)?, caps.get(1)?);
            Some(Param {
                name: param.as_str().to_string(),
                optional: bracket.is_some_and(|b| whole.start() > b),
            })
        })
        .collect();

    Some(Signature {
        name: name.to_string(),
        params,
        doc: doc.to_string(),
    })
}

/// Byte offset of the `)` closing the `(` at `open`.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn param(name: &str, optional: bool) -> Param {
        Param {
            name: name.to_string(),
            optional,
        }
    }

    #[test]
    fn dotted_name_with_optional_tail() {
        let sig = parse_signature("foo.bar({a}, {b}, [{c}]) some text").unwrap();
        assert_eq!(sig.name, "foo.bar");
        assert_eq!(
            sig.params,
            vec![param("a", false), param("b", false), param("c", true)]
        );
        assert_eq!(sig.doc, "some text");
    }

    #[test]
    fn prose_is_not_a_signature() {
        assert_eq!(parse_signature("not a signature"), None);
        assert_eq!(parse_signature("  indented({a})"), None);
        assert_eq!(parse_signature("name ({a})"), None);
    }

    #[test]
    fn unbalanced_parenthesis_is_not_a_signature() {
        assert_eq!(parse_signature("foo({a} (x)"), None);
    }

    #[test]
    fn empty_parameter_list() {
        let sig = parse_signature("changenr()\t\tNumber of current change").unwrap();
        assert_eq!(sig.name, "changenr");
        assert!(sig.params.is_empty());
        assert_eq!(sig.doc, "Number of current change");
    }

    #[test]
    fn nested_optional_brackets() {
        let sig = parse_signature("add({object}, {expr} [, {idx} [, {end}]])").unwrap();
        assert_eq!(
            sig.params,
            vec![
                param("object", false),
                param("expr", false),
                param("idx", true),
                param("end", true),
            ]
        );
        assert_eq!(sig.doc, "");
    }

    #[test]
    fn signature_spanning_lines() {
        let text = "assert_equalfile({fname-one},\n\t\t{fname-two} [, {msg}])\n\t\tCompare files.";
        let sig = parse_signature(text).unwrap();
        assert_eq!(sig.name, "assert_equalfile");
        assert_eq!(
            sig.params,
            vec![
                param("fname-one", false),
                param("fname-two", false),
                param("msg", true),
            ]
        );
        assert_eq!(sig.doc, "\n\t\tCompare files.");
    }

    #[test]
    fn braces_after_signature_are_doc() {
        let sig = parse_signature("abs({expr})\tFloat\tabsolute value of {expr}").unwrap();
        assert_eq!(sig.params, vec![param("expr", false)]);
        assert_eq!(sig.doc, "Float\tabsolute value of {expr}");
    }

    #[test]
    fn optional_before_required_is_accepted() {
        let sig = parse_signature("odd([{a}], {b})").unwrap();
        assert_eq!(sig.params, vec![param("a", true), param("b", true)]);
    }

    #[test]
    fn duplicate_and_malformed_braces_degrade() {
        let sig = parse_signature("dup({a}, {a}, {b, {})").unwrap();
        assert_eq!(sig.params, vec![param("a", false), param("a", false)]);
    }

    #[test]
    fn body_lines_keep_their_indentation() {
        let sig = parse_signature("abs({expr})  \t\n\t\tReturn.\n\t\t  Deeper.\n<\n\n").unwrap();
        assert_eq!(sig.doc, "\n\t\tReturn.\n\t\t  Deeper.\n<");
    }

    #[test]
    fn unicode_names_and_params() {
        let sig = parse_signature("fóo({ä} [, {ß}])").unwrap();
        assert_eq!(sig.name, "fóo");
        assert_eq!(sig.params, vec![param("ä", false), param("ß", true)]);
        assert_eq!(parse_signature("1abc()"), None);
    }

    #[test]
    fn autoload_style_names() {
        let sig = parse_signature("dist#ft#Check({x})").unwrap();
        assert_eq!(sig.name, "dist#ft#Check");
    }
}
