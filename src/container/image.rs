/// Extracts a version label from an image reference.
///
/// The reference is split on its last `:` into repository and tag. The tag is
/// returned only when the repository contains `marker`. Registry ports
/// (`host:5000/repo`) are not told apart from tags.
///
/// # Examples
///
/// ```
/// # use docker_state_exporter::container::extract_version;
/// assert_eq!(extract_version("org/aiforward-service:v2.3", "aiforward"), Some("v2.3"));
/// assert_eq!(extract_version("org/other-service:v2.3", "aiforward"), None);
/// assert_eq!(extract_version("org/aiforward-service", "aiforward"), None);
/// ```
pub fn extract_version<'a>(image: &'a str, marker: &str) -> Option<&'a str> {
    let (repository, tag) = image.rsplit_once(':')?;
    repository.contains(marker).then_some(tag)
}

/// Version labelling for images that follow an internal naming convention.
#[derive(Debug, Clone)]
pub struct VersionExtractor {
    marker: String,
}

impl VersionExtractor {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Returns the version label for `image`, or an empty string.
    pub fn label<'a>(&self, image: &'a str) -> &'a str {
        extract_version(image, &self.marker).unwrap_or_default()
    }
}
