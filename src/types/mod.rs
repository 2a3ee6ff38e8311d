mod artifact;
mod change_set;
mod deployment_run;
mod deployment_state;
mod fingerprint;
mod object;
mod object_kind;
mod object_name;

pub use artifact::ScriptedArtifact;
pub use change_set::{
    ChangeCategory, ChangeSet, DuplicateObjectWarning, InventorySide, ModifiedObject,
};
pub use deployment_run::DeploymentRun;
pub use deployment_state::{DeploymentState, RunOutcome};
pub use fingerprint::{Fingerprint, normalize_definition};
pub use object::{DatabaseObject, ObjectInventory};
pub use object_kind::{ObjectKind, ScriptFolder};
pub use object_name::ObjectName;
