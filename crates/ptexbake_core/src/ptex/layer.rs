use crate::ptex::{
	Image, LogRes, LoopPtex, Mesh, PackOptions, PackResult, PtexError, Result, TexelInfo, pack_loops, update_from_image,
};

/// Named per-loop raster layer of one mesh, plus its packed image.
#[derive(Debug, Clone)]
pub struct PtexLayer {
	name: String,
	texel_info: TexelInfo,
	loops: Vec<LoopPtex>,
	image: Option<Image>,
}

impl PtexLayer {
	/// One default-filled raster of `logres` per mesh loop.
	pub fn new(name: impl Into<String>, mesh: &Mesh, info: TexelInfo, logres: LogRes) -> Result<Self> {
		let loops = (0..mesh.num_loops()).map(|_| LoopPtex::new(info, logres)).collect::<Result<Vec<_>>>()?;
		Ok(Self {
			name: name.into(),
			texel_info: info,
			loops,
			image: None,
		})
	}

	/// Adopt prebuilt rasters; they must cover every mesh loop with one texel layout.
	pub fn from_loops(name: impl Into<String>, mesh: &Mesh, info: TexelInfo, loops: Vec<LoopPtex>) -> Result<Self> {
		if loops.len() != mesh.num_loops() {
			return Err(PtexError::LoopCountMismatch {
				expected: mesh.num_loops(),
				got: loops.len(),
			});
		}
		if let Some((loop_index, raster)) = loops.iter().enumerate().find(|(_, raster)| raster.texel_info() != info) {
			return Err(PtexError::MixedTexelInfo {
				loop_index,
				expected: info,
				got: raster.texel_info(),
			});
		}
		Ok(Self {
			name: name.into(),
			texel_info: info,
			loops,
			image: None,
		})
	}

	/// Layer name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Texel layout shared by every loop raster.
	pub fn texel_info(&self) -> TexelInfo {
		self.texel_info
	}

	/// Loop rasters indexed by mesh loop.
	pub fn loops(&self) -> &[LoopPtex] {
		&self.loops
	}

	/// Mutable loop rasters. Call [`PtexLayer::mark_for_update`] after editing.
	pub fn loops_mut(&mut self) -> &mut [LoopPtex] {
		&mut self.loops
	}

	/// Raster of one loop.
	pub fn loop_ptex(&self, index: usize) -> Result<&LoopPtex> {
		self.loops.get(index).ok_or(PtexError::LoopOutOfRange {
			index,
			len: self.loops.len(),
		})
	}

	/// Packed image, if one was built.
	pub fn image(&self) -> Option<&Image> {
		self.image.as_ref()
	}

	/// Mutable packed image.
	pub fn image_mut(&mut self) -> Option<&mut Image> {
		self.image.as_mut()
	}

	/// Fill every loop with the debug pattern keyed by its loop index.
	pub fn fill_pattern(&mut self) {
		for (index, raster) in self.loops.iter_mut().enumerate() {
			raster.fill_pattern(index);
		}
	}

	/// Resample every loop raster to `logres`.
	pub fn resize_all(&mut self, logres: LogRes) -> Result<()> {
		for raster in &mut self.loops {
			raster.resize(logres)?;
		}
		self.mark_for_update();
		Ok(())
	}

	/// Packed image of this layer, packing on demand.
	///
	/// Repacks when there is no image yet or its buffers were freed. A new
	/// image is named after the layer.
	pub fn mesh_image(&mut self, mesh: &Mesh, options: &PackOptions) -> Result<&Image> {
		let stale = self.image.as_ref().is_none_or(|image| !image.has_buffer());
		if stale {
			let PackResult { atlas, filter } = pack_loops(mesh, &self.loops, options)?;
			if let Some(report) = filter {
				log::debug!("layer {} filter: {report:?}", self.name);
			}
			match &mut self.image {
				Some(image) => image.assign_atlas(atlas),
				None => self.image = Some(Image::new_from_atlas(self.name.clone(), atlas)),
			}
		}
		self.image.as_ref().ok_or_else(|| PtexError::NoImageBuffer { name: self.name.clone() })
	}

	/// Free the packed image buffers so the next [`PtexLayer::mesh_image`] repacks.
	pub fn mark_for_update(&mut self) {
		if let Some(image) = &mut self.image {
			image.free_buffers();
		}
	}

	/// Copy the packed image back into the loop rasters.
	pub fn update_from_image(&mut self) -> Result<()> {
		let atlas = self
			.image
			.as_ref()
			.and_then(Image::atlas)
			.ok_or_else(|| PtexError::NoImageBuffer { name: self.name.clone() })?;
		update_from_image(&mut self.loops, atlas)
	}
}

/// Named Ptex layers attached to one mesh.
#[derive(Debug, Clone, Default)]
pub struct PtexLayers {
	layers: Vec<PtexLayer>,
}

impl PtexLayers {
	/// Empty collection.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a layer; names must be unique.
	pub fn add(&mut self, layer: PtexLayer) -> Result<&mut PtexLayer> {
		if self.get(layer.name()).is_some() {
			return Err(PtexError::DuplicateLayer { name: layer.name.clone() });
		}
		self.layers.push(layer);
		let index = self.layers.len() - 1;
		Ok(&mut self.layers[index])
	}

	/// Layer by name.
	pub fn get(&self, name: &str) -> Option<&PtexLayer> {
		self.layers.iter().find(|layer| layer.name == name)
	}

	/// Mutable layer by name.
	pub fn get_mut(&mut self, name: &str) -> Option<&mut PtexLayer> {
		self.layers.iter_mut().find(|layer| layer.name == name)
	}

	/// Remove and return a layer.
	pub fn remove(&mut self, name: &str) -> Result<PtexLayer> {
		let index = self
			.layers
			.iter()
			.position(|layer| layer.name == name)
			.ok_or_else(|| PtexError::LayerNotFound { name: name.to_owned() })?;
		Ok(self.layers.remove(index))
	}

	/// Layers in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &PtexLayer> {
		self.layers.iter()
	}

	/// Number of layers.
	pub fn len(&self) -> usize {
		self.layers.len()
	}

	/// Whether there are no layers.
	pub fn is_empty(&self) -> bool {
		self.layers.is_empty()
	}
}
