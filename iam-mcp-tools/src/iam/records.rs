//! Normalized IAM records returned to the host.

use aws_sdk_iam::types::{AttachedPolicy, Policy, Role};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// How a policy relates to the role it was listed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyKind {
    Inline,
    Attached,
    /// Listed on its own, not through a role
    #[default]
    Unset,
}

impl PolicyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyKind::Inline => "inline",
            PolicyKind::Attached => "attached",
            PolicyKind::Unset => "",
        }
    }
}

impl Serialize for PolicyKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A policy as returned by `list_policies` and `get_role_policies`.
///
/// Records with [`PolicyKind::Unset`] serialize as `{"Name": ..}` only;
/// role-scoped records carry `Name`, `Type` and `Arn`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PolicyRecord {
    pub name: String,
    pub kind: PolicyKind,
    /// Empty unless the policy is attached
    pub arn: String,
}

impl PolicyRecord {
    pub fn inline(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PolicyKind::Inline,
            arn: String::new(),
        }
    }

    pub fn attached(name: impl Into<String>, arn: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PolicyKind::Attached,
            arn: arn.into(),
        }
    }
}

impl Serialize for PolicyRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.kind == PolicyKind::Unset {
            let mut s = serializer.serialize_struct("Policy", 1)?;
            s.serialize_field("Name", &self.name)?;
            return s.end();
        }

        let mut s = serializer.serialize_struct("Policy", 3)?;
        s.serialize_field("Name", &self.name)?;
        s.serialize_field("Type", &self.kind)?;
        s.serialize_field("Arn", &self.arn)?;
        s.end()
    }
}

impl From<&Policy> for PolicyRecord {
    fn from(policy: &Policy) -> Self {
        Self {
            name: policy.policy_name().unwrap_or_default().to_string(),
            kind: PolicyKind::Unset,
            arn: String::new(),
        }
    }
}

impl From<&AttachedPolicy> for PolicyRecord {
    fn from(policy: &AttachedPolicy) -> Self {
        Self::attached(
            policy.policy_name().unwrap_or_default(),
            policy.policy_arn().unwrap_or_default(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleRecord {
    pub name: String,
}

impl From<&Role> for RoleRecord {
    fn from(role: &Role) -> Self {
        Self {
            name: role.role_name().to_string(),
        }
    }
}
