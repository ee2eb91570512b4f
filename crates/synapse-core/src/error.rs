/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the data model.
///
/// Every variant is recoverable: callers turn them into a one-line message
/// for the player and carry on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// No room with this name exists in the graph.
    #[error("there is no room called \"{0}\"")]
    RoomNotFound(String),

    /// A room with the same name (case-insensitive) is already registered.
    #[error("room already exists: \"{0}\"")]
    DuplicateRoom(String),

    /// The room has no exit in the requested direction.
    #[error("you can't go {0} from here")]
    NoExit(String),

    /// Crossing into or out of this room requires a keycard.
    #[error("{0} is locked. A keycard reader blinks red.")]
    KeycardRequired(String),

    /// The room has been sealed; nothing goes in or out.
    #[error("{0} has been sealed")]
    RoomSealed(String),

    /// The object is not lying in the current room.
    #[error("there is no {0} here")]
    ItemNotHere(String),

    /// The object exists but cannot be picked up.
    #[error("you can't take the {0}")]
    NotTakeable(String),

    /// The item is already in the inventory.
    #[error("you are already carrying the {0}")]
    AlreadyCarried(String),

    /// Carrying the item would exceed the inventory's weight capacity.
    #[error("the {item} is too heavy to carry (capacity {capacity})")]
    TooHeavy {
        /// The item that did not fit.
        item: String,
        /// The inventory's weight capacity.
        capacity: u32,
    },

    /// The item is not in the inventory.
    #[error("you are not carrying the {0}")]
    NotCarried(String),

    /// A dialogue node already has a choice with this normalized key.
    #[error("duplicate dialogue choice: \"{0}\"")]
    DuplicateChoice(String),

    /// A node handle does not belong to the graph.
    #[error("dialogue node {0} does not exist")]
    NodeNotFound(usize),

    /// The player's input does not select any dialogue choice.
    #[error("\"{0}\" is not one of the options")]
    InvalidChoice(String),

    /// A message template could not be rendered.
    #[error("malformed template: {0}")]
    Template(String),
}
