//! Override-aware rewriting of generated class directive headers.
//!
//! The auto-documenter emits class headers and base-class links under the
//! reflected names. This pass rewrites both to the overridden names so the
//! cross references resolve.

use super::overrides::OverrideTable;

/// Rewrite directive headers and base-class links in place.
pub(crate) fn rewrite_directive_header(
    overrides: &OverrideTable,
    is_exception: bool,
    lines: &mut Vec<String>,
) {
    let (role, directive) = if is_exception {
        ("exc", "exception")
    } else {
        ("class", "class")
    };
    for (key, target) in overrides.entries() {
        let old = &key.name;
        let new = &target.name;
        // Base classes are linked with :class: today; accept the exception
        // role as well in case that changes.
        for line in lines.iter_mut() {
            *line = line
                .replace(&format!(":class:`{old}`"), &format!(":{role}:`{new}`"))
                .replace(&format!(":{role}:`{old}`"), &format!(":{role}:`{new}`"));
        }
        let (Some((old_mod, old_cls)), Some((new_mod, new_cls))) =
            (old.rsplit_once('.'), new.rsplit_once('.'))
        else {
            continue;
        };
        replace_header_pair(
            lines,
            (
                &format!(".. py:{directive}:: {old_cls}"),
                &format!("   :module: {old_mod}"),
            ),
            (
                &format!(".. py:{directive}:: {new_cls}"),
                &format!("   :module: {new_mod}"),
            ),
        );
    }
}

/// Replace the first occurrence of a two-line header, preserving whatever
/// prefix indents it and whatever suffix follows the first line.
fn replace_header_pair(lines: &mut [String], old: (&str, &str), new: (&str, &str)) {
    for l in 0..lines.len().saturating_sub(1) {
        let Some(start) = lines[l].find(old.0) else {
            continue;
        };
        let prefix = lines[l][..start].to_owned();
        let suffix = lines[l][start + old.0.len()..].to_owned();
        if lines[l + 1].starts_with(&format!("{prefix}{}", old.1)) {
            lines[l] = format!("{prefix}{}{suffix}", new.0);
            lines[l + 1] = format!("{prefix}{}", new.1);
            return;
        }
    }
}
