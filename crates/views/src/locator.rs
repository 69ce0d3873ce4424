use std::fmt;

/// Where the content for a registered view comes from.
///
/// Resource locators are handed verbatim to the renderer. Bundle locators are
/// first fetched through the [`BundleLoader`](crate::BundleLoader), and the
/// delivered asset is handed to the renderer instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentLocator {
	/// A path the renderer resolves on its own (a resource or prefab path).
	Resource(String),
	/// Named content that lives inside an asset bundle.
	Bundle {
		/// Name of the content inside the bundle.
		name: String,
		/// Path of the bundle to load.
		bundle: String,
	},
}

impl ContentLocator {
	pub fn resource(path: impl Into<String>) -> Self {
		Self::Resource(path.into())
	}

	/// Creates a bundle locator. An empty bundle path means the content is not
	/// bundled at all, so the name is treated as a resource path.
	pub fn bundle(name: impl Into<String>, bundle: impl Into<String>) -> Self {
		let bundle = bundle.into();
		if bundle.is_empty() {
			return Self::Resource(name.into());
		}
		Self::Bundle { name: name.into(), bundle }
	}

	pub fn bundle_path(&self) -> Option<&str> {
		match self {
			Self::Resource(_) => None,
			Self::Bundle { bundle, .. } => Some(bundle),
		}
	}

	pub fn is_bundled(&self) -> bool {
		matches!(self, Self::Bundle { .. })
	}

	/// The loader request for bundled content.
	pub fn asset_request(&self) -> Option<AssetRequest> {
		match self {
			Self::Resource(_) => None,
			Self::Bundle { name, bundle } => Some(AssetRequest {
				bundle: bundle.clone(),
				name: name.clone(),
			}),
		}
	}
}

impl From<&str> for ContentLocator {
	fn from(path: &str) -> Self {
		Self::Resource(path.to_owned())
	}
}

impl From<String> for ContentLocator {
	fn from(path: String) -> Self {
		Self::Resource(path)
	}
}

impl fmt::Display for ContentLocator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Resource(path) => f.write_str(path),
			Self::Bundle { name, bundle } => write!(f, "{bundle}:{name}"),
		}
	}
}

/// Request handed to a [`BundleLoader`](crate::BundleLoader).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BundleRequest {
	/// Path of the bundle to load.
	pub bundle: String,
}

/// Request for bundled view content handed to
/// [`BundleLoader::load_view`](crate::BundleLoader::load_view).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRequest {
	/// Path of the bundle holding the content.
	pub bundle: String,
	/// Name of the content inside the bundle.
	pub name: String,
}

impl fmt::Display for AssetRequest {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.bundle, self.name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_bundle_path_falls_back_to_resource() {
		assert_eq!(ContentLocator::bundle("menu", ""), ContentLocator::resource("menu"));
		assert!(!ContentLocator::bundle("menu", "").is_bundled());
	}

	#[test]
	fn bundle_locator_displays_bundle_and_name() {
		let locator = ContentLocator::bundle("credits", "ui/dialogs");
		assert_eq!(locator.bundle_path(), Some("ui/dialogs"));
		assert_eq!(locator.to_string(), "ui/dialogs:credits");
	}

	#[test]
	fn only_bundle_locators_yield_asset_requests() {
		let request = ContentLocator::bundle("credits", "ui/dialogs").asset_request().unwrap();
		assert_eq!(request.to_string(), "ui/dialogs:credits");
		assert_eq!(ContentLocator::resource("ui/credits").asset_request(), None);
	}
}
