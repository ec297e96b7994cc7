use serde::{Deserialize, Serialize};
use slim_core::docs::{ClassRecord, DocIndex};
use slim_core::resolve::ResolvedContext;
use tower_lsp::lsp_types::{Command, CompletionItem, CompletionItemKind, Documentation, MarkupContent, MarkupKind};

const SHOW_FUNCTION_DOC: &str = "slimTools.showFunctionDoc";
const SHOW_PROPERTY_DOC: &str = "slimTools.showPropertyDoc";
const SHOW_CONSTRUCTOR_DOC: &str = "slimTools.showConstructorDoc";

/// Record a completion item was built from, round-tripped through the
/// client in `CompletionItem::data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub(crate) enum CompletionData {
    Method {
        #[serde(rename = "className")]
        class_name: String,
        name: String,
    },
    Property {
        #[serde(rename = "className")]
        class_name: String,
        name: String,
    },
    Function {
        name: String,
    },
    Constructor {
        #[serde(rename = "className")]
        class_name: String,
    },
    Callback {
        name: String,
    },
}

fn show_doc(command: &str, target: String) -> Command {
    Command {
        title: "Show Documentation".to_string(),
        command: command.to_string(),
        arguments: Some(vec![serde_json::Value::String(target)]),
    }
}

fn item(label: String, kind: CompletionItemKind, detail: String, data: CompletionData, command: Command) -> CompletionItem {
    CompletionItem {
        label,
        kind: Some(kind),
        detail: Some(detail),
        data: serde_json::to_value(&data).ok(),
        command: Some(command),
        ..Default::default()
    }
}

/// Completion candidates for the context being typed.
pub(crate) fn completion_items(context: Option<&ResolvedContext>, docs: &DocIndex) -> Vec<CompletionItem> {
    match context {
        Some(ResolvedContext::Member { class_name, .. }) => docs
            .lookup_class(class_name)
            .map(|class| member_items(class_name, class))
            .unwrap_or_default(),
        _ => global_items(docs),
    }
}

fn member_items(class_name: &str, class: &ClassRecord) -> Vec<CompletionItem> {
    let methods = class.methods.iter().map(|(name, method)| {
        item(
            name.clone(),
            CompletionItemKind::METHOD,
            method.signature.clone(),
            CompletionData::Method {
                class_name: class_name.to_string(),
                name: name.clone(),
            },
            show_doc(SHOW_FUNCTION_DOC, format!("{class_name}.{name}")),
        )
    });
    let properties = class.properties.iter().map(|(name, prop)| {
        item(
            name.clone(),
            CompletionItemKind::PROPERTY,
            format!("Type: {}", prop.ty),
            CompletionData::Property {
                class_name: class_name.to_string(),
                name: name.clone(),
            },
            show_doc(SHOW_PROPERTY_DOC, format!("{class_name}.{name}")),
        )
    });
    methods.chain(properties).collect()
}

fn global_items(docs: &DocIndex) -> Vec<CompletionItem> {
    let functions = docs.functions().map(|(name, f)| {
        item(
            name.to_string(),
            CompletionItemKind::FUNCTION,
            f.signature.clone(),
            CompletionData::Function { name: name.to_string() },
            show_doc(SHOW_FUNCTION_DOC, name.to_string()),
        )
    });
    let constructors = docs.classes().map(|(name, class)| {
        item(
            name.to_string(),
            CompletionItemKind::CLASS,
            class.constructor_info().signature,
            CompletionData::Constructor {
                class_name: name.to_string(),
            },
            show_doc(SHOW_CONSTRUCTOR_DOC, name.to_string()),
        )
    });
    let callbacks = docs.callbacks().map(|(name, cb)| {
        item(
            cb.signature.clone(),
            CompletionItemKind::EVENT,
            cb.signature.clone(),
            CompletionData::Callback { name: name.to_string() },
            show_doc(SHOW_FUNCTION_DOC, name.to_string()),
        )
    });
    functions.chain(constructors).chain(callbacks).collect()
}

fn documentation_for(data: &CompletionData, docs: &DocIndex) -> Option<String> {
    match data {
        CompletionData::Method { class_name, name } => {
            let method = docs.lookup_class(class_name)?.method(name)?;
            Some(format!(
                "**{class_name}.{name}** (method)\n\n```slim\n{}\n```\n\n{}",
                method.signature, method.description
            ))
        }
        CompletionData::Property { class_name, name } => {
            let prop = docs.lookup_class(class_name)?.property(name)?;
            Some(format!(
                "**{class_name}.{name}** (property)\nType: {}\n\n{}",
                prop.ty, prop.description
            ))
        }
        CompletionData::Function { name } => {
            let f = docs.lookup_function(name)?;
            Some(format!("**{name}**\n\n```slim\n{}\n```\n\n{}", f.signature, f.description))
        }
        CompletionData::Constructor { class_name } => {
            let ctor = docs.lookup_class(class_name)?.constructor_info();
            Some(format!(
                "**{class_name}** (constructor)\n\n```slim\n{}\n```\n\n{}",
                ctor.signature, ctor.description
            ))
        }
        CompletionData::Callback { name } => {
            let cb = docs.lookup_callback(name)?;
            Some(format!("**{name}**\n\n```slim\n{}\n```\n\n{}", cb.signature, cb.description))
        }
    }
}

/// Fill in `documentation` from the item's `data`. Items without
/// recognisable data come back unchanged.
pub(crate) fn resolve_item(mut item: CompletionItem, docs: &DocIndex) -> CompletionItem {
    let data = item
        .data
        .clone()
        .and_then(|value| serde_json::from_value::<CompletionData>(value).ok());
    if let Some(markdown) = data.and_then(|d| documentation_for(&d, docs)) {
        item.documentation = Some(Documentation::MarkupContent(MarkupContent {
            kind: MarkupKind::Markdown,
            value: markdown,
        }));
    }
    item
}
