//! The merge engine: splice a page's editable areas into its template.

use crate::domain::errors::MergeError;
use crate::domain::marker::{self, MarkerKind, Scanner};

/// Rebuild `target` from `template`, keeping the target's editable areas.
///
/// Non-editable content is sourced exclusively from the template, which is
/// how a redesign propagates to every page. Editable areas are copied
/// byte-for-byte from the target, bounding tags included; the engine never
/// inspects what a page author wrote inside them. The template-reference tag
/// is echoed from the target so a hand-edited reference survives a re-merge.
///
/// The whole output is computed in memory; the caller only writes it to disk
/// once the merge has succeeded, so a structural failure can never corrupt
/// the file being updated.
pub fn apply_template(template: &str, target: &str) -> Result<String, MergeError> {
    let mut tpl = Scanner::new(template);
    let mut tgt = Scanner::new(target);

    let tpl_ref = tpl
        .next_marker(MarkerKind::TemplateRef)
        .ok_or(MergeError::ReferenceMissingInTemplate)?;
    let tgt_ref = tgt
        .next_marker(MarkerKind::TemplateRef)
        .ok_or(MergeError::ReferenceMissingInTarget)?;

    let mut out = String::with_capacity(template.len() + target.len());
    out.push_str(&template[..tpl_ref.start]);
    out.push_str(&target[tgt_ref.start..tgt_ref.end]);
    tpl.seek(tpl_ref.end);
    tgt.seek(tgt_ref.end);

    while let Some(start) = tgt.next_marker(MarkerKind::AreaStart) {
        let area = start.name;

        // The target's start tag, fully spelled, must appear ahead of the
        // template cursor; an out-of-order area surfaces here as not found.
        let start_tag = &target[start.start..start.end];
        let (tpl_start, _) = tpl.find_tag(start_tag).ok_or_else(|| {
            MergeError::AreaMissingInTemplate { area: area.to_owned() }
        })?;
        out.push_str(&template[tpl.pos()..tpl_start]);
        tpl.seek(tpl_start);

        let end_tag = marker::end_tag(area);
        let (_, tpl_end) = tpl.find_tag(&end_tag).ok_or_else(|| {
            MergeError::EndTagMissingInTemplate { area: area.to_owned() }
        })?;
        tpl.seek(tpl_end);

        tgt.seek(start.start);
        let (_, tgt_end) = tgt.find_tag(&end_tag).ok_or_else(|| {
            MergeError::EndTagMissingInTarget { area: area.to_owned() }
        })?;
        out.push_str(&target[start.start..tgt_end]);
        tgt.seek(tgt_end);
    }

    out.push_str(&template[tpl.pos()..]);
    Ok(out)
}
