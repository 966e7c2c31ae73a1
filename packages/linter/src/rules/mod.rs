mod info_required;
mod local_refs;
mod openapi_version;
mod operation_id;
mod operation_responses;
mod operation_tags;
mod path_keys;
mod path_params;
mod paths_required;
mod servers_defined;

pub use info_required::InfoRequiredRule;
pub use local_refs::LocalRefsRule;
pub use openapi_version::OpenApiVersionRule;
pub use operation_id::OperationIdRule;
pub use operation_responses::OperationResponsesRule;
pub use operation_tags::OperationTagsRule;
pub use path_keys::PathKeysRule;
pub use path_params::PathParamsRule;
pub use paths_required::PathsRequiredRule;
pub use servers_defined::ServersDefinedRule;

use crate::diagnostic::Finding;
use apistudio_document::NodePath;
use serde_json::{Map, Value};

/// Trait for implementing lint rules
pub trait LintRule: Send + Sync {
    /// Unique identifier for this rule
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Check the whole document projection
    fn check(&self, spec: &Value) -> Vec<Finding>;
}

/// Registry of all available lint rules
pub struct RuleRegistry {
    rules: Vec<Box<dyn LintRule>>,
}

impl RuleRegistry {
    /// Create a new registry with all built-in rules
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(OpenApiVersionRule),
                Box::new(InfoRequiredRule),
                Box::new(PathsRequiredRule),
                Box::new(PathKeysRule),
                Box::new(OperationResponsesRule),
                Box::new(OperationIdRule),
                Box::new(PathParamsRule),
                Box::new(LocalRefsRule),
                Box::new(OperationTagsRule),
                Box::new(ServersDefinedRule),
            ],
        }
    }

    /// Get all registered rules
    pub fn rules(&self) -> &[Box<dyn LintRule>] {
        &self.rules
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a custom rule to the registry
    pub fn add_rule(&mut self, rule: Box<dyn LintRule>) {
        self.rules.push(rule);
    }

    /// Drop the rules named in `names`
    pub fn disable(&mut self, names: &[impl AsRef<str>]) {
        self.rules
            .retain(|rule| !names.iter().any(|name| name.as_ref() == rule.name()));
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &format!("{} rules", self.rules.len()))
            .finish()
    }
}

/// HTTP methods that introduce an operation under a path item
pub(crate) const METHODS: [&str; 8] =
    ["get", "put", "post", "delete", "options", "head", "patch", "trace"];

/// One operation of the `paths` object
pub(crate) struct Operation<'a> {
    pub route: &'a str,
    pub method: &'static str,
    pub item: &'a Map<String, Value>,
    pub body: &'a Value,
}

impl Operation<'_> {
    pub fn path(&self) -> NodePath {
        NodePath::from(["paths", self.route, self.method])
    }

    pub fn pointer(&self) -> String {
        self.path().to_pointer()
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.method.to_uppercase(), self.route)
    }
}

/// Every operation in document order
pub(crate) fn operations(spec: &Value) -> Vec<Operation<'_>> {
    let Some(paths) = spec.get("paths").and_then(Value::as_object) else {
        return Vec::new();
    };
    let mut ops = Vec::new();
    for (route, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        for method in METHODS {
            if let Some(body) = item.get(method) {
                ops.push(Operation {
                    route,
                    method,
                    item,
                    body,
                });
            }
        }
    }
    ops
}
