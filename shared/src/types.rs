/// Synchronization directive accompanying every mutation in the core.
///
/// The data mutation itself always happens. The directive only decides which
/// of the side effects run afterwards:
///
/// | Variant  | wire message | focused projection |
/// |----------|--------------|--------------------|
/// | `Server` | yes          | yes                |
/// | `Ui`     | no           | yes                |
/// | `Shape`  | no           | no                 |
///
/// Inbound handlers always pass `Ui`, so a message received from the server
/// is never echoed back to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyncTo {
    Server,
    Ui,
    Shape,
}

impl SyncTo {
    pub fn emits(self) -> bool {
        self == SyncTo::Server
    }

    pub fn refreshes_projection(self) -> bool {
        match self {
            SyncTo::Server | SyncTo::Ui => true,
            SyncTo::Shape => false,
        }
    }
}
