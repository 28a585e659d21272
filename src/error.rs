use crate::ui::core::id::ComponentId;
use std::fmt;

/// Configuration errors raised synchronously by structural operations on the
/// component tree. None of them are retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    /// The id does not name a live component.
    UnknownComponent(ComponentId),
    /// `init` was never called for the component.
    NotInitialized(ComponentId),
    Closed(ComponentId),
    /// A component cannot own itself.
    SelfOwnership(ComponentId),
    /// The component is already bound to a different owner.
    OwnershipConflict {
        component: ComponentId,
        owner: ComponentId,
    },
    /// The requested owner is a leaf and cannot hold children.
    NotAContainer(ComponentId),
    /// The root is never attached to anything and only closes on shutdown.
    Root,
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::UnknownComponent(id) => write!(f, "unknown component {id:?}"),
            UiError::NotInitialized(id) => write!(f, "component {id:?} is not initialized"),
            UiError::Closed(id) => write!(f, "component {id:?} is closed"),
            UiError::SelfOwnership(id) => {
                write!(f, "component {id:?} cannot be added to itself")
            }
            UiError::OwnershipConflict { component, owner } => write!(
                f,
                "component {component:?} already has owner {owner:?}"
            ),
            UiError::NotAContainer(id) => {
                write!(f, "component {id:?} is not a container")
            }
            UiError::Root => write!(f, "operation not allowed on the root component"),
        }
    }
}

impl std::error::Error for UiError {}
