use thiserror::Error;

use crate::ptex::TexelInfo;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, PtexError>;

/// Errors produced while building, packing, importing, and exporting Ptex data.
#[derive(Debug, Error)]
pub enum PtexError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Image encoding failure while saving an atlas.
	#[error("image: {0}")]
	Image(#[from] image::ImageError),
	/// Mesh description could not be parsed.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Channel count outside the supported range.
	#[error("invalid channel count {channels} (expected 1..=4)")]
	InvalidChannelCount {
		/// Requested channel count.
		channels: u8,
	},
	/// Unknown texel data type tag.
	#[error("unsupported texel data type tag {tag}")]
	UnsupportedDataType {
		/// Raw tag value.
		tag: u8,
	},
	/// Log2 resolution outside `[0, 30]`.
	#[error("log resolution out of range: u={u}, v={v} (limit 30)")]
	InvalidLogRes {
		/// Requested log2 width.
		u: u32,
		/// Requested log2 height.
		v: u32,
	},
	/// Raster side length is not a power of two.
	#[error("resolution {width}x{height} is not a power of two")]
	NotPowerOfTwo {
		/// Requested width.
		width: u32,
		/// Requested height.
		height: u32,
	},
	/// Fill pixel has fewer components than the raster has channels.
	#[error("pixel too short: need {need} channels, have {have}")]
	PixelTooShort {
		/// Required channel count.
		need: usize,
		/// Supplied components.
		have: usize,
	},
	/// Texel storage length does not match the declared dimensions.
	#[error("buffer size mismatch: expected {expected} values, got {got}")]
	BufferSizeMismatch {
		/// Expected number of channel values.
		expected: usize,
		/// Actual number of channel values.
		got: usize,
	},
	/// Two buffers that must agree on texel layout do not.
	#[error("texel info mismatch: expected {expected}, got {got}")]
	TexelInfoMismatch {
		/// Layout of the destination.
		expected: TexelInfo,
		/// Layout of the source.
		got: TexelInfo,
	},
	/// A rectangle does not fit inside its image.
	#[error("region {width}x{height}+{x}+{y} outside {image_width}x{image_height} image")]
	RegionOutOfBounds {
		/// Region left edge.
		x: u32,
		/// Region bottom edge.
		y: u32,
		/// Region width.
		width: u32,
		/// Region height.
		height: u32,
		/// Image width.
		image_width: u32,
		/// Image height.
		image_height: u32,
	},
	/// Quad sub-rasters do not have the alternating half/transposed layout.
	#[error("quad split layout mismatch at sub-face {index}")]
	QuadLayoutMismatch {
		/// Offending sub-face index.
		index: usize,
	},
	/// Quad loops cannot be merged because their resolutions disagree.
	#[error("quad polygon {poly} has inconsistent loop resolutions")]
	QuadResolutionMismatch {
		/// Polygon index.
		poly: usize,
	},
	/// More than two polygons share one edge.
	#[error("non-manifold edge {edge}: polygons {polys:?} all use it")]
	NonManifoldEdge {
		/// Edge index.
		edge: usize,
		/// Two existing occupants plus the rejected polygon.
		polys: [u32; 3],
	},
	/// Per-loop record count differs from the mesh loop count.
	#[error("loop count mismatch: mesh has {expected} loops, got {got}")]
	LoopCountMismatch {
		/// Mesh loop count.
		expected: usize,
		/// Supplied record count.
		got: usize,
	},
	/// Face description is unusable.
	#[error("invalid face {face}: {reason}")]
	InvalidFace {
		/// Face index in the description.
		face: usize,
		/// Short reason label.
		reason: &'static str,
	},
	/// Loop index outside the mesh.
	#[error("loop index {index} out of range (loops={len})")]
	LoopOutOfRange {
		/// Requested loop index.
		index: usize,
		/// Mesh loop count.
		len: usize,
	},
	/// Layout finalize was called with no items.
	#[error("packed layout has no items")]
	EmptyLayout,
	/// Layout item id outside `[0, len)`.
	#[error("layout id {id} out of range (items={len})")]
	LayoutIdOutOfRange {
		/// Item id.
		id: usize,
		/// Number of items.
		len: usize,
	},
	/// Layout item id was added twice.
	#[error("duplicate layout id {id}")]
	DuplicateLayoutId {
		/// Item id.
		id: usize,
	},
	/// Layout finalize found an id that was never added.
	#[error("layout id {id} was never added")]
	MissingLayoutId {
		/// Item id.
		id: usize,
	},
	/// Rasters do not fit in an atlas below the configured side limit.
	#[error("atlas would exceed max side {max_side}")]
	AtlasTooLarge {
		/// Configured side limit.
		max_side: u32,
	},
	/// Atlas region and loop raster have different sizes.
	#[error("atlas region {region_width}x{region_height} does not match loop {loop_index} raster {width}x{height}")]
	RegionSizeMismatch {
		/// Loop index.
		loop_index: usize,
		/// Region width.
		region_width: u32,
		/// Region height.
		region_height: u32,
		/// Raster width.
		width: u32,
		/// Raster height.
		height: u32,
	},
	/// Loops in one layer disagree on texel layout.
	#[error("loop {loop_index} has texel info {got}, layer uses {expected}")]
	MixedTexelInfo {
		/// Offending loop index.
		loop_index: usize,
		/// Layer texel layout.
		expected: TexelInfo,
		/// Loop texel layout.
		got: TexelInfo,
	},
	/// Unknown leading file magic.
	#[error("unsupported compression or not a .ptxa archive (magic={magic:?})")]
	UnknownMagic {
		/// First up-to-4 bytes of the stream.
		magic: [u8; 4],
	},
	/// Decompressed stream did not start with `PTXA`.
	#[error("decompressed data does not start with PTXA magic")]
	NotArchiveAfterDecompress,
	/// Unsupported archive version.
	#[error("unsupported archive version {version} (expected 1)")]
	UnsupportedArchiveVersion {
		/// Parsed version.
		version: u16,
	},
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Subimage index past the archive face count.
	#[error("subimage {index} out of range (faces={count})")]
	SubimageOutOfRange {
		/// Requested subimage.
		index: usize,
		/// Number of subimages.
		count: usize,
	},
	/// Read was attempted before any seek.
	#[error("no subimage selected")]
	NoSubimageSelected,
	/// Layer name already used on this mesh.
	#[error("duplicate ptex layer: {name}")]
	DuplicateLayer {
		/// Layer name.
		name: String,
	},
	/// Requested layer name was not found.
	#[error("ptex layer not found: {name}")]
	LayerNotFound {
		/// Layer name.
		name: String,
	},
	/// Layer has no packed image to read back from.
	#[error("ptex layer {name} has no image buffer")]
	NoImageBuffer {
		/// Layer name.
		name: String,
	},
	/// Tessellated face loops refer to different source loops.
	#[error("tessellated face id mismatch: expected {expected}, got {got}")]
	TessFaceIdMismatch {
		/// Id of the first loop.
		expected: u32,
		/// Id of the mismatching loop.
		got: u32,
	},
}
