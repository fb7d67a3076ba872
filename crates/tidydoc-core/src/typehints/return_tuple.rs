//! Per-element annotations for documented tuple returns.
//!
//! A docstring whose return section names one field per tuple element gets
//! each field line annotated with the element's type:
//!
//! ```text
//! :returns: a
//!               An integer
//!           b
//!               A float
//! ```
//!
//! becomes `a : <int rendering>` and `b : <float rendering>` when the return
//! annotation is a two-element tuple.

use std::sync::OnceLock;

use regex::Regex;
use tidydoc_host::{DocSymbol, TypeDescriptor};

use super::formatting::{format_both, FormatContext};

fn return_field() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^:returns?: ").unwrap())
}

/// The element types of a tuple return annotation.
///
/// A union return counts when one of its members is a tuple; the first tuple
/// member wins.
fn tuple_elements(annotation: &TypeDescriptor) -> Option<&[TypeDescriptor]> {
    match annotation {
        TypeDescriptor::Generic { origin, args } if origin.is_tuple() => Some(args),
        TypeDescriptor::Union(members) => members.iter().find_map(|member| match member {
            TypeDescriptor::Generic { origin, args } if origin.is_tuple() => Some(&args[..]),
            _ => None,
        }),
        _ => None,
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Annotate the return-section field names of a tuple-returning symbol.
///
/// Leaves the lines alone unless the number of named fields matches the
/// number of tuple elements exactly.
pub(crate) fn process_docstring(
    ctx: &FormatContext<'_>,
    symbol: &DocSymbol,
    lines: &mut Vec<String>,
) {
    let Some(ret) = symbol.signature.as_ref().and_then(|sig| sig.ret.as_ref()) else {
        return;
    };
    let Some(elements) = tuple_elements(ret) else {
        return;
    };

    // Locate the return section: it starts at the field marker and ends at
    // the first line with content left of the field body indent.
    let mut i_prefix = None;
    let mut l_start = 0;
    let mut l_end = lines.len().saturating_sub(1);
    for (l, line) in lines.iter().enumerate() {
        match i_prefix {
            None => {
                if let Some(m) = return_field().find(line) {
                    i_prefix = Some(m.end());
                    l_start = l;
                }
            }
            Some(prefix) => {
                let head = line.get(..prefix).unwrap_or(line);
                if !head.trim().is_empty() {
                    l_end = l - 1;
                    break;
                }
            }
        }
    }
    let Some(i_prefix) = i_prefix else { return };

    // A field name is an identifier at the body indent whose description
    // follows on the next, further-indented line.
    let mut name_lines = Vec::new();
    for l in l_start..=l_end {
        let Some(rest) = lines[l].get(i_prefix..) else {
            continue;
        };
        if is_identifier(rest) && lines.get(l + 1).is_some_and(|next| next.starts_with("    ")) {
            name_lines.push(l);
        }
    }

    if name_lines.len() == elements.len() {
        for (&l, element) in name_lines.iter().zip(elements) {
            let rendered = format_both(ctx, element);
            lines[l] = format!("{} : {rendered}", lines[l]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidydoc_host::{Signature, SymbolKind};

    use crate::typehints::overrides::OverrideTable;

    fn symbol_returning(ret: TypeDescriptor) -> DocSymbol {
        DocSymbol::new(SymbolKind::Function, "mypkg.f").with_signature(Signature {
            params: vec![],
            ret: Some(ret),
        })
    }

    fn docstring() -> Vec<String> {
        vec![
            ":returns: a".to_owned(),
            "              An integer".to_owned(),
            "          b".to_owned(),
            "              A float".to_owned(),
        ]
    }

    fn run(ret: TypeDescriptor, lines: &mut Vec<String>) {
        let table = OverrideTable::new();
        let ctx = FormatContext {
            overrides: &table,
            fully_qualified: false,
            simplify_unions: true,
        };
        process_docstring(&ctx, &symbol_returning(ret), lines);
    }

    #[test]
    fn test_annotates_matching_fields() {
        let mut lines = docstring();
        run(
            TypeDescriptor::tuple_of(vec![
                TypeDescriptor::builtin("int"),
                TypeDescriptor::builtin("float"),
            ]),
            &mut lines,
        );
        assert_eq!(lines[0], ":returns: a : :py:class:`int`");
        assert_eq!(lines[2], "          b : :py:class:`float`");
        assert_eq!(lines[1], "              An integer");
    }

    #[test]
    fn test_tuple_inside_union() {
        let mut lines = docstring();
        run(
            TypeDescriptor::optional(TypeDescriptor::tuple_of(vec![
                TypeDescriptor::builtin("int"),
                TypeDescriptor::builtin("float"),
            ])),
            &mut lines,
        );
        assert!(lines[0].ends_with("a : :py:class:`int`"));
    }

    #[test]
    fn test_count_mismatch_leaves_lines_alone() {
        let mut lines = docstring();
        run(
            TypeDescriptor::tuple_of(vec![TypeDescriptor::builtin("int")]),
            &mut lines,
        );
        assert_eq!(lines, docstring());
    }

    #[test]
    fn test_non_tuple_return_ignored() {
        let mut lines = docstring();
        run(TypeDescriptor::builtin("int"), &mut lines);
        assert_eq!(lines, docstring());
    }

    #[test]
    fn test_section_ends_at_next_field() {
        let mut lines = vec![
            ":returns: a".to_owned(),
            "              An integer".to_owned(),
            ":rtype: whatever".to_owned(),
            "          b".to_owned(),
            "              Not a field".to_owned(),
        ];
        run(
            TypeDescriptor::tuple_of(vec![TypeDescriptor::builtin("int")]),
            &mut lines,
        );
        assert_eq!(lines[0], ":returns: a : :py:class:`int`");
        assert_eq!(lines[3], "          b");
    }
}
