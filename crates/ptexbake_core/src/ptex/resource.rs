use crate::ptex::AtlasImage;

/// Named image resource that takes ownership of a packed atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
	name: String,
	atlas: Option<AtlasImage>,
}

impl Image {
	/// Create an image that owns `atlas`.
	pub fn new_from_atlas(name: impl Into<String>, atlas: AtlasImage) -> Self {
		Self {
			name: name.into(),
			atlas: Some(atlas),
		}
	}

	/// Replace the image buffers with `atlas`, dropping any previous one.
	pub fn assign_atlas(&mut self, atlas: AtlasImage) {
		self.atlas = Some(atlas);
	}

	/// Drop the buffers; the image itself stays.
	pub fn free_buffers(&mut self) {
		if self.atlas.take().is_some() {
			log::debug!("freed buffers of image {}", self.name);
		}
	}

	/// Whether the image currently holds an atlas.
	pub fn has_buffer(&self) -> bool {
		self.atlas.is_some()
	}

	/// Owned atlas, if any.
	pub fn atlas(&self) -> Option<&AtlasImage> {
		self.atlas.as_ref()
	}

	/// Mutable access for in-place edits before reading back into loops.
	pub fn atlas_mut(&mut self) -> Option<&mut AtlasImage> {
		self.atlas.as_mut()
	}

	/// Move the atlas out, leaving the image without buffers.
	pub fn take_atlas(&mut self) -> Option<AtlasImage> {
		self.atlas.take()
	}

	/// Image name.
	pub fn name(&self) -> &str {
		&self.name
	}
}
