//! Identity types for berth
//!
//! Units are named by the surrounding framework (e.g. `controller/0`);
//! endpoints name the local relation instance and namespace every flag
//! raised on its behalf.

use std::fmt;

/// Name of a remote unit on the other side of the relation.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct UnitName(pub String);

impl UnitName {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        UnitName(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unit({})", self.0)
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Local endpoint instance name.
///
/// Every flag this adapter raises is namespaced under
/// `endpoint.<name>.`, so two endpoints on the same node never collide.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct EndpointId(pub String);

impl EndpointId {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        EndpointId(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Expand a flag name fragment into this endpoint's namespace.
    pub fn expand(&self, fragment: &str) -> String {
        format!("endpoint.{}.{}", self.0, fragment)
    }
}

impl fmt::Debug for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Endpoint({})", self.0)
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_namespaces_fragment() {
        let endpoint = EndpointId::new("slurm-controller");
        assert_eq!(
            endpoint.expand("active.available"),
            "endpoint.slurm-controller.active.available"
        );
    }

    #[test]
    fn test_unit_name_ordering() {
        let mut names = vec![UnitName::new("controller/1"), UnitName::new("controller/0")];
        names.sort();
        assert_eq!(names[0].as_str(), "controller/0");
    }
}
