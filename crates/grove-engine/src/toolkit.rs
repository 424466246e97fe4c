//! Per-task view of a located toolkit.

use grove_core::task::TaskKind;
use grove_core::version::Version;
use grove_reflect::class::ClassRef;
use grove_reflect::invoker::{
    find_constructor, find_method, invoke_constructor, invoke_method, invoke_static_method,
};
use grove_reflect::locator::ToolkitLocator;
use grove_reflect::value::Value;
use grove_util::errors::{GroveError, GroveResult};
use tracing::{debug, warn};

use crate::eras::CallPlan;
use crate::outcome::{DegradedFeature, Feature, TaskOutcome};

/// Everything a task flow needs to talk to one toolkit.
///
/// Created once per task and passed explicitly to every step; nothing about
/// the toolkit is kept in global state.
#[derive(Debug)]
pub struct Toolkit {
    locator: ToolkitLocator,
    version: Version,
    indy: bool,
    runtime: Option<Version>,
    plan: CallPlan,
    degraded: Vec<DegradedFeature>,
}

impl Toolkit {
    /// Detect the toolkit behind `locator` and resolve its call plan.
    pub fn detect(locator: ToolkitLocator) -> GroveResult<Self> {
        let version = locator.version()?;
        let indy = locator.is_indy_variant();
        let runtime = locator.runtime_version();
        debug!(
            "detected toolkit {version} (indy: {indy}, runtime: {})",
            runtime.as_ref().map_or("unknown".to_string(), Version::to_string)
        );
        Ok(Self {
            plan: CallPlan::select(&version),
            locator,
            version,
            indy,
            runtime,
            degraded: Vec::new(),
        })
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn is_indy_variant(&self) -> bool {
        self.indy
    }

    pub fn runtime_version(&self) -> Option<&Version> {
        self.runtime.as_ref()
    }

    pub fn plan(&self) -> &CallPlan {
        &self.plan
    }

    pub fn degraded(&self) -> &[DegradedFeature] {
        &self.degraded
    }

    /// Whether the runtime is at least `min`. An unknown runtime is assumed capable.
    pub fn runtime_at_least(&self, min: &Version) -> bool {
        self.runtime
            .as_ref()
            .map_or(true, |r| r.compare_with(min, false).is_ge())
    }

    pub(crate) fn runtime_label(&self) -> String {
        self.runtime
            .as_ref()
            .map_or_else(|| "unknown".to_string(), Version::to_string)
    }

    pub fn class(&self, name: &str) -> GroveResult<ClassRef> {
        self.locator.class(name)
    }

    /// The task's class context, passed where the toolkit expects a class loader.
    pub fn loader(&self) -> Value {
        Value::Context(self.locator.context().clone())
    }

    pub fn new_instance(&self, class: &str, params: &[&str], args: Vec<Value>) -> GroveResult<Value> {
        let class = self.class(class)?;
        invoke_constructor(&find_constructor(&class, params)?, args)
    }

    /// Invoke `method` on an object, resolved against the object's own class.
    pub fn call(
        &self,
        target: &Value,
        method: &str,
        params: &[&str],
        args: Vec<Value>,
    ) -> GroveResult<Value> {
        let object = target.as_object().ok_or_else(|| GroveError::ReflectiveUsage {
            message: format!("Cannot invoke {method} on {}", target.type_name()),
        })?;
        let found = find_method(object.class(), method, params)?;
        invoke_method(&found, target, args)
    }

    pub fn call_static(
        &self,
        class: &str,
        method: &str,
        params: &[&str],
        args: Vec<Value>,
    ) -> GroveResult<Value> {
        let class = self.class(class)?;
        let found = find_method(&class, method, params)?;
        invoke_static_method(&found, args)
    }

    /// Drop an optional feature with a warning.
    pub fn degrade(&mut self, feature: Feature, message: String) {
        warn!("{message}");
        self.record(feature, message);
    }

    pub(crate) fn record(&mut self, feature: Feature, message: String) {
        self.degraded.push(DegradedFeature { feature, message });
    }

    pub fn into_outcome(self, kind: TaskKind, compiled_classes: Option<usize>) -> TaskOutcome {
        TaskOutcome {
            kind,
            version: Some(self.version),
            indy: self.indy,
            forked: false,
            compiled_classes,
            degraded: self.degraded,
        }
    }
}
