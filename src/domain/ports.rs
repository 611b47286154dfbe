use std::io;

/// Backing store for the record file. Single writer; nothing else is
/// expected to touch the underlying resource while a store owns it.
pub trait RecordStorage {
    /// Returns `None` when nothing has been persisted yet.
    fn load(&self) -> io::Result<Option<String>>;

    /// Replaces the whole persisted content.
    fn save(&self, contents: &str) -> io::Result<()>;

    /// Human readable location, used in logs and error messages.
    fn location(&self) -> String;
}
