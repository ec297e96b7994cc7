use slim_core::docs::DocIndex;
use slim_core::resolve::ResolvedContext;

/// Markdown hover text for a resolved context, or `None` when the
/// documentation has nothing to say about it.
pub(crate) fn hover_markdown(context: &ResolvedContext, docs: &DocIndex) -> Option<String> {
    match context {
        ResolvedContext::Bare {
            word,
            instance_class: Some(class),
        } => Some(format!("**{word}** (instance of {class})")),
        ResolvedContext::Member { word, class_name, .. } => member_markdown(docs, class_name, word),
        ResolvedContext::Bare { word, .. } => bare_markdown(docs, word),
    }
}

fn member_markdown(docs: &DocIndex, class_name: &str, word: &str) -> Option<String> {
    let class = docs.lookup_class(class_name)?;
    if let Some(method) = class.method(word) {
        return Some(format!(
            "**{class_name}.{word}** (method)\n```slim\n{}\n```\n\n{}",
            method.signature, method.description
        ));
    }
    class.property(word).map(|prop| {
        format!(
            "**{class_name}.{word}** (property)\nType: {}\n\n{}",
            prop.ty, prop.description
        )
    })
}

fn bare_markdown(docs: &DocIndex, word: &str) -> Option<String> {
    if let Some(f) = docs.lookup_function(word) {
        return Some(format!(
            "**{word}** ({} function)\n\n**Return Type:** `{}`\n```slim\n{}\n```\n\n{}",
            f.source, f.return_type, f.signature, f.description
        ));
    }
    if let Some((name, cb)) = docs.find_callback(word) {
        return Some(format!(
            "**{name}** (callback)\n\n```slim\n{}\n```\n\n{}",
            cb.signature, cb.description
        ));
    }
    if let Some(ty) = docs.lookup_type(word) {
        return Some(format!("**{word}** (type)\n\n{}", ty.description));
    }
    let ctor = docs.lookup_class(word)?.constructor_info();
    Some(format!(
        "**{word}** (class)\n\n```slim\n{}\n```\n\n{}",
        ctor.signature, ctor.description
    ))
}
