//! Prefixing of element ids and the references pointing at them, so that
//! several SVG fragments can be merged into one document without collisions.

use std::collections::HashMap;
use std::sync::LazyLock;

use log::debug;
use regex::{Captures, Regex};

use crate::tree::Element;

static URL_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"url\(#([^)]*)\)").expect("url() reference pattern"));

/// Return a copy of `tree` with every `id` prefixed by `prefix` and every
/// `#id` / `url(#id)` reference to those ids rewritten to match.
///
/// References to ids not defined in `tree` are left alone; they may point into
/// another document. When two elements share an id the later one wins the
/// mapping.
pub fn prefix_ids(tree: &Element, prefix: &str) -> Element {
    let mut root = tree.clone();

    let ids = rename_ids(&mut root, prefix);
    if ids.is_empty() {
        return root;
    }

    let mut rewritten = 0usize;
    root.walk_mut(&mut |el| {
        for (_, v) in el.attributes.iter_mut() {
            if let Some(nv) = rewrite_reference(v, &ids) {
                *v = nv;
                rewritten += 1;
            }
        }
    });

    debug!(
        "prefix_ids: renamed {} ids, rewrote {} references with prefix {:?}",
        ids.len(),
        rewritten,
        prefix
    );
    root
}

fn rename_ids(root: &mut Element, prefix: &str) -> HashMap<String, String> {
    let mut ids = HashMap::new();
    root.walk_mut(&mut |el| {
        if let Some((_, v)) = el.attributes.iter_mut().find(|(k, _)| k == "id") {
            let new_id = format!("{}{}", prefix, v);
            let old_id = std::mem::replace(v, new_id.clone());
            ids.insert(old_id, new_id);
        }
    });
    ids
}

/// New value for an attribute, or `None` if it references nothing in `ids`.
fn rewrite_reference(value: &str, ids: &HashMap<String, String>) -> Option<String> {
    if let Some(new_id) = value.strip_prefix('#').and_then(|id| ids.get(id)) {
        return Some(format!("#{}", new_id));
    }

    if !value.contains("url(#") {
        return None;
    }
    let mut changed = false;
    let out = URL_REF.replace_all(value, |caps: &Captures| match ids.get(&caps[1]) {
        Some(new_id) => {
            changed = true;
            format!("url(#{})", new_id)
        }
        None => caps[0].to_string(),
    });
    changed.then(|| out.into_owned())
}
