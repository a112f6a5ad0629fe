pub trait MapArchive {
    /// Reads one object, returning `None` when the key does not exist.
    fn read_object(&self, key: &str) -> Result<Option<Vec<u8>>, String>;
}
