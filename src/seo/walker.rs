use serde_json::Value;

/// Recursive traversal over the editor's content tree.
///
/// The tree is owned by the external editor and treated as untrusted input:
/// traversal is total. A node contributes itself before its children; nodes
/// that are not objects, `children` fields that are not arrays, and missing
/// fields all contribute nothing instead of failing the walk.
pub fn walk<'a, F>(node: &'a Value, visit: &mut F)
where
    F: FnMut(&'a Value),
{
    if !node.is_object() {
        return;
    }

    visit(node);

    if let Some(children) = node.get("children").and_then(Value::as_array) {
        for child in children {
            walk(child, visit);
        }
    }
}

/// Concatenate every text leaf in document order, space-separated
pub fn collect_text(node: &Value) -> String {
    let mut parts: Vec<&str> = Vec::new();
    walk(node, &mut |n| {
        if let Some(text) = n.get("text").and_then(Value::as_str) {
            parts.push(text);
        }
    });
    parts.join(" ")
}

/// Count heading nodes at the given level (`attrs.level`)
pub fn count_headings(node: &Value, level: u64) -> usize {
    let mut count = 0;
    walk(node, &mut |n| {
        let is_heading = n.get("type").and_then(Value::as_str) == Some("heading");
        let node_level = n
            .get("attrs")
            .and_then(|a| a.get("level"))
            .and_then(Value::as_u64);
        if is_heading && node_level == Some(level) {
            count += 1;
        }
    });
    count
}
