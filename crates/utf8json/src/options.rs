/// Configuration options for [`JsonWriter`](crate::JsonWriter).
///
/// # Examples
///
/// ```rust
/// use utf8json::{JsonWriter, WriterOptions};
///
/// let mut writer = JsonWriter::with_options(WriterOptions {
///     escape_forward_slash: true,
///     ..Default::default()
/// });
/// writer.write_value("a/b");
/// assert_eq!(writer.result(), r#""a\/b""#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    /// Number of bytes reserved in the output buffer before the first write.
    ///
    /// The buffer still grows by doubling once this is exhausted; a good
    /// estimate only saves the early reallocations.
    ///
    /// # Default
    ///
    /// `256`
    pub initial_capacity: usize,

    /// Whether to escape `/` as `\/` inside strings.
    ///
    /// JSON allows either form. Enabling this matches output produced by
    /// older writers that always escaped the solidus, which is occasionally
    /// needed when the text is embedded in an HTML `<script>` block.
    ///
    /// # Default
    ///
    /// `false`
    pub escape_forward_slash: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            initial_capacity: 256,
            escape_forward_slash: false,
        }
    }
}
