//! Elegant annotation rendering.
//!
//! Two renderings exist for every annotation: a terse one in the style of the
//! large numeric packages (`str | None`, `{str: int}`, `(int) → str`) and a
//! full one that spells every type out as a cross reference. Signature sites
//! show both, stacked via the `annotation-terse`/`annotation-full` roles;
//! nested renderings only override the class-link case and defer the rest to
//! the stock rendering.

use tidydoc_host::{ClassRef, FormatSite, TypeDescriptor};

use super::baseline;
use super::overrides::OverrideTable;

/// Everything the render functions need to know besides the annotation.
pub struct FormatContext<'a> {
    pub overrides: &'a OverrideTable,
    /// Spell out module paths instead of prefixing a tilde.
    pub fully_qualified: bool,
    /// Join unions with ` | ` instead of `, `.
    pub simplify_unions: bool,
}

impl FormatContext<'_> {
    fn tilde(&self) -> &'static str {
        if self.fully_qualified { "" } else { "~" }
    }
}

fn override_link(ctx: &FormatContext<'_>, class: &ClassRef) -> Option<String> {
    let target = ctx.overrides.get(None, &class.full_name())?;
    let role = target.role.clone().unwrap_or_else(|| {
        if class.is_exception {
            "py:exc".to_owned()
        } else {
            "py:class".to_owned()
        }
    });
    Some(format!(":{role}:`{}{}`", ctx.tilde(), target.name))
}

/// Render the full form, or decline.
///
/// Declining means the stock rendering is already right: builtins, the
/// typing namespace, and any class without an override entry.
pub fn format_full(ctx: &FormatContext<'_>, annotation: &TypeDescriptor) -> Option<String> {
    match annotation {
        TypeDescriptor::Class(class) => {
            if class.is_builtin() || class.is_typing() {
                return None;
            }
            override_link(ctx, class)
        }
        TypeDescriptor::Generic { origin, args } => {
            if origin.is_typing() {
                return None;
            }
            let link = override_link(ctx, origin)?;
            let rendered: Vec<String> = args.iter().map(|arg| render_full(ctx, arg)).collect();
            Some(format!("{link}{}", baseline::bracketed(&rendered)))
        }
        TypeDescriptor::Alias { name, .. } => override_link(ctx, name),
        TypeDescriptor::Union(_) | TypeDescriptor::Literal(_) | TypeDescriptor::Callable { .. } => {
            None
        }
    }
}

/// Render the full form unconditionally.
///
/// Shapes [`format_full`] declines are spelled out the stock way, but every
/// class met along the way still goes through the override table.
fn render_full(ctx: &FormatContext<'_>, annotation: &TypeDescriptor) -> String {
    if let Some(rendered) = format_full(ctx, annotation) {
        return rendered;
    }
    match annotation {
        TypeDescriptor::Generic { origin, args } => {
            let rendered: Vec<String> = args.iter().map(|arg| render_full(ctx, arg)).collect();
            format!(
                "{}{}",
                baseline::class_link(origin, ctx.fully_qualified),
                baseline::bracketed(&rendered)
            )
        }
        TypeDescriptor::Union(members) => {
            let rendered: Vec<String> =
                members.iter().map(|m| render_full(ctx, m)).collect();
            format!(
                "{}{}",
                baseline::typing_link("Union", ctx.fully_qualified),
                baseline::bracketed(&rendered)
            )
        }
        TypeDescriptor::Callable { params, ret } => {
            let params = match params {
                Some(params) => {
                    let rendered: Vec<String> =
                        params.iter().map(|p| render_full(ctx, p)).collect();
                    format!("\\ \\[{}]", rendered.join(", "))
                }
                None => "...".to_owned(),
            };
            format!(
                "{}{}",
                baseline::typing_link("Callable", ctx.fully_qualified),
                baseline::bracketed(&[params, render_full(ctx, ret)])
            )
        }
        _ => baseline::render(annotation, ctx.fully_qualified),
    }
}

/// Render the terse form.
pub fn format_terse(ctx: &FormatContext<'_>, annotation: &TypeDescriptor) -> String {
    match annotation {
        TypeDescriptor::Union(members) => {
            let sep = if ctx.simplify_unions { " | " } else { ", " };
            members
                .iter()
                .map(|m| format_terse(ctx, m))
                .collect::<Vec<_>>()
                .join(sep)
        }
        // Mapping arguments add noise without adding meaning.
        TypeDescriptor::Generic { origin, .. } if origin.is_abstract_mapping() => {
            format!(":py:class:`{}typing.Mapping`", ctx.tilde())
        }
        TypeDescriptor::Generic { origin, args } if origin.is_dict() && args.len() == 2 => {
            format!(
                "{{{}: {}}}",
                format_terse(ctx, &args[0]),
                format_terse(ctx, &args[1])
            )
        }
        TypeDescriptor::Callable { params, ret } => {
            let params = match params {
                Some(params) => params
                    .iter()
                    .map(|p| format_terse(ctx, p))
                    .collect::<Vec<_>>()
                    .join(", "),
                None => "…".to_owned(),
            };
            format!("({params}) → {}", format_terse(ctx, ret))
        }
        TypeDescriptor::Literal(values) => {
            let values: Vec<String> = values.iter().map(ToString::to_string).collect();
            format!("{{{}}}", values.join(", "))
        }
        // An alias with an override links to itself; otherwise its value
        // spells out what it stands for.
        TypeDescriptor::Alias { name, value } => {
            override_link(ctx, name).unwrap_or_else(|| format_terse(ctx, value))
        }
        _ => render_full(ctx, annotation),
    }
}

/// Render terse and full forms together for a signature site.
///
/// When both renderings agree, one copy is enough; otherwise they are wrapped
/// in the `annotation-terse`/`annotation-full` roles so the theme can show
/// the terse one and reveal the full one on demand.
#[must_use]
pub fn format_both(ctx: &FormatContext<'_>, annotation: &TypeDescriptor) -> String {
    let terse = format_terse(ctx, annotation);
    let full = render_full(ctx, annotation);
    if terse == full {
        return terse;
    }
    format!(
        ":annotation-terse:`{}`\\ :annotation-full:`{}`",
        escape(&terse),
        escape(&full)
    )
}

/// Render an annotation for the given site.
///
/// Signature sites get the stacked dual rendering; nested renderings only
/// claim the class-link case.
#[must_use]
pub fn format_inline(
    ctx: &FormatContext<'_>,
    annotation: &TypeDescriptor,
    site: FormatSite,
) -> Option<String> {
    match site {
        FormatSite::Parameter | FormatSite::Return => Some(format_both(ctx, annotation)),
        FormatSite::Nested => format_full(ctx, annotation),
    }
}

pub(crate) fn escape(rst: &str) -> String {
    rst.replace('`', "\\`")
}
