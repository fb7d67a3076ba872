//! Stock annotation rendering.
//!
//! This mirrors what the host builder produces on its own: every annotation
//! becomes a fully spelled-out cross reference. The elegant formatter falls
//! back to it for shapes it leaves alone, and the injection pass uses it when
//! no formatter is active.

use tidydoc_host::{ClassRef, TypeDescriptor};

/// Render a class reference as a cross reference.
pub(crate) fn class_link(class: &ClassRef, fully_qualified: bool) -> String {
    if class.is_none() {
        return ":py:obj:`None`".to_owned();
    }
    if class.is_builtin() {
        return format!(":py:class:`{}`", class.qualname);
    }
    let tilde = if fully_qualified { "" } else { "~" };
    let role = if class.is_typing() {
        "py:data"
    } else if class.is_exception {
        "py:exc"
    } else {
        "py:class"
    };
    format!(":{role}:`{tilde}{}`", class.full_name())
}

pub(crate) fn typing_link(qualname: &str, fully_qualified: bool) -> String {
    class_link(&ClassRef::new("typing", qualname), fully_qualified)
}

/// Render the bracketed argument list that follows a parametrized reference.
pub(crate) fn bracketed(parts: &[String]) -> String {
    format!("\\ \\[{}]", parts.join(", "))
}

/// Render an annotation the way the host builder would without any
/// formatter active.
pub(crate) fn render(annotation: &TypeDescriptor, fully_qualified: bool) -> String {
    match annotation {
        TypeDescriptor::Class(class) => class_link(class, fully_qualified),
        TypeDescriptor::Generic { origin, args } => {
            let rendered: Vec<String> =
                args.iter().map(|arg| render(arg, fully_qualified)).collect();
            format!("{}{}", class_link(origin, fully_qualified), bracketed(&rendered))
        }
        TypeDescriptor::Union(members) => {
            let rendered: Vec<String> =
                members.iter().map(|m| render(m, fully_qualified)).collect();
            format!("{}{}", typing_link("Union", fully_qualified), bracketed(&rendered))
        }
        TypeDescriptor::Literal(values) => {
            let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
            format!("{}{}", typing_link("Literal", fully_qualified), bracketed(&rendered))
        }
        TypeDescriptor::Callable { params, ret } => {
            let params = match params {
                Some(params) => {
                    let rendered: Vec<String> =
                        params.iter().map(|p| render(p, fully_qualified)).collect();
                    format!("\\ \\[{}]", rendered.join(", "))
                }
                None => "...".to_owned(),
            };
            format!(
                "{}{}",
                typing_link("Callable", fully_qualified),
                bracketed(&[params, render(ret, fully_qualified)])
            )
        }
        TypeDescriptor::Alias { name, .. } => class_link(name, fully_qualified),
    }
}
