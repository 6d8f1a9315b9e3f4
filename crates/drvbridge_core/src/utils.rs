//! Small helpers shared by the argument processing paths.

use crate::error::{DriverError, DriverResult};

/// Attribute holding the module a type is declared in.
pub const MODULE_ATTR: &str = "module";

/// Attribute holding the simple name of a type.
pub const NAME_ATTR: &str = "name";

/// A value with a truth value.
///
/// Evaluation is fallible because host values may override it with
/// arbitrary code.
pub trait Truthy {
    /// Returns the truth value.
    fn truthy(&self) -> DriverResult<bool>;
}

impl Truthy for bool {
    fn truthy(&self) -> DriverResult<bool> {
        Ok(*self)
    }
}

/// Gets a boolean from an optional argument.
///
/// Returns `default` when the argument is absent, otherwise its truth value.
/// A failing truth evaluation is returned unchanged.
pub fn coerce_bool<T: Truthy + ?Sized>(value: Option<&T>, default: bool) -> DriverResult<bool> {
    match value {
        None => Ok(default),
        Some(value) => value.truthy(),
    }
}

/// Describes a type by named attributes.
pub trait TypeDescriptor {
    /// Looks up a text attribute of the type.
    fn attribute(&self, name: &str) -> DriverResult<String>;
}

/// Returns the module and the simple name of a type.
pub fn module_and_name(ty: &dyn TypeDescriptor) -> DriverResult<(String, String)> {
    let module = ty.attribute(MODULE_ATTR)?;
    let name = ty.attribute(NAME_ATTR)?;
    Ok((module, name))
}

fn missing_attribute(name: &str) -> DriverError {
    DriverError::TypeMismatch {
        expected: format!("type attribute '{MODULE_ATTR}' or '{NAME_ATTR}'"),
        actual: format!("'{name}'"),
    }
}

/// A type descriptor with fixed module and name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticType {
    module: &'static str,
    name: &'static str,
}

impl StaticType {
    /// Creates a descriptor.
    pub const fn new(module: &'static str, name: &'static str) -> Self {
        Self { module, name }
    }
}

impl TypeDescriptor for StaticType {
    fn attribute(&self, name: &str) -> DriverResult<String> {
        match name {
            MODULE_ATTR => Ok(self.module.to_string()),
            NAME_ATTR => Ok(self.name.to_string()),
            other => Err(missing_attribute(other)),
        }
    }
}

/// Describes a Rust type by its path as reported by [`std::any::type_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RustType {
    path: &'static str,
}

impl RustType {
    /// Describes `T`.
    pub fn of<T: ?Sized>() -> Self {
        Self {
            path: std::any::type_name::<T>(),
        }
    }

    /// Describes the type of `value`.
    pub fn of_val<T: ?Sized>(_value: &T) -> Self {
        Self::of::<T>()
    }

    // References describe their referent. Tuples and slices have no module
    // of their own. Generic arguments may contain `::`, so split before them.
    fn split(&self) -> (&'static str, &'static str) {
        let mut path = self.path;
        while let Some(rest) = path.strip_prefix('&') {
            path = rest.strip_prefix("mut ").unwrap_or(rest);
        }
        if path.starts_with('(') || path.starts_with('[') {
            return ("", path);
        }
        let base_end = path.find('<').unwrap_or(path.len());
        match path[..base_end].rfind("::") {
            Some(idx) => (&path[..idx], &path[idx + 2..]),
            None => ("", path),
        }
    }
}

impl TypeDescriptor for RustType {
    fn attribute(&self, name: &str) -> DriverResult<String> {
        let (module, simple) = self.split();
        match name {
            MODULE_ATTR => Ok(module.to_string()),
            NAME_ATTR => Ok(simple.to_string()),
            other => Err(missing_attribute(other)),
        }
    }
}
