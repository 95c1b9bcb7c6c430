use etagere::{BucketedAtlasAllocator, Size, size2};
use serde::Serialize;

use crate::ptex::{PtexError, Result};

/// Axis-aligned rectangle inside a packed atlas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PackedRegion {
	/// Left edge.
	pub x: u32,
	/// Bottom edge.
	pub y: u32,
	/// Width in texels.
	pub width: u32,
	/// Height in texels.
	pub height: u32,
}

impl PackedRegion {
	/// Whether two regions share any texel.
	pub fn overlaps(&self, other: &PackedRegion) -> bool {
		self.x < other.x + other.width && other.x < self.x + self.width && self.y < other.y + other.height && other.y < self.y + self.height
	}

	/// Number of texels covered.
	pub fn area(&self) -> u64 {
		u64::from(self.width) * u64::from(self.height)
	}
}

/// Finalized layout: packed bounds plus one region per item id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackedPlacement {
	/// Packed bounds width.
	pub width: u32,
	/// Packed bounds height.
	pub height: u32,
	/// Regions indexed by item id.
	pub regions: Vec<PackedRegion>,
}

/// Rectangle packer collecting sized items before placing them all at once.
#[derive(Debug, Clone)]
pub struct PackedLayout {
	items: Vec<Option<(u32, u32)>>,
}

impl PackedLayout {
	/// Layout expecting exactly `count` items with ids `0..count`.
	pub fn new(count: usize) -> Self {
		Self { items: vec![None; count] }
	}

	/// Register an item of `width × height` under `id`.
	pub fn add(&mut self, width: u32, height: u32, id: usize) -> Result<()> {
		let len = self.items.len();
		let slot = self.items.get_mut(id).ok_or(PtexError::LayoutIdOutOfRange { id, len })?;
		if slot.is_some() {
			return Err(PtexError::DuplicateLayoutId { id });
		}
		*slot = Some((width, height));
		Ok(())
	}

	/// Place every item without overlap, growing the allocator up to `max_side`.
	pub fn finalize(&self, max_side: u32) -> Result<PackedPlacement> {
		if self.items.is_empty() {
			return Err(PtexError::EmptyLayout);
		}
		let mut sizes = Vec::with_capacity(self.items.len());
		for (id, item) in self.items.iter().enumerate() {
			sizes.push(item.ok_or(PtexError::MissingLayoutId { id })?);
		}

		let max_side = max_side.min(i32::MAX as u32);
		let total_area: u64 = sizes.iter().map(|&(w, h)| u64::from(w) * u64::from(h)).sum();
		let largest = sizes.iter().map(|&(w, h)| w.max(h)).max().unwrap_or(1);
		if largest > max_side {
			return Err(PtexError::AtlasTooLarge { max_side });
		}
		let mut side = ((total_area as f64).sqrt().ceil() as u32).max(largest).max(1).checked_next_power_of_two().unwrap_or(max_side).min(max_side);

		// Tall items first keeps shelves dense.
		let mut order: Vec<usize> = (0..sizes.len()).collect();
		order.sort_by(|&a, &b| sizes[b].1.cmp(&sizes[a].1).then(sizes[b].0.cmp(&sizes[a].0)).then(a.cmp(&b)));

		let mut allocator = BucketedAtlasAllocator::new(Size::splat(side as i32));
		let mut regions = vec![PackedRegion::default(); sizes.len()];
		for id in order {
			let (width, height) = sizes[id];
			if width == 0 || height == 0 {
				continue;
			}
			let allocation = loop {
				if let Some(allocation) = allocator.allocate(size2(width as i32, height as i32)) {
					break allocation;
				}
				if side >= max_side {
					return Err(PtexError::AtlasTooLarge { max_side });
				}
				side = side.saturating_mul(2).min(max_side);
				log::trace!("growing packed layout to {side}x{side}");
				allocator.grow(Size::splat(side as i32));
			};
			regions[id] = PackedRegion {
				x: allocation.rectangle.min.x as u32,
				y: allocation.rectangle.min.y as u32,
				width,
				height,
			};
		}

		let width = regions.iter().map(|r| r.x + r.width).max().unwrap_or(0);
		let height = regions.iter().map(|r| r.y + r.height).max().unwrap_or(0);
		log::debug!("packed {} items into {width}x{height} (allocator side {side})", regions.len());
		Ok(PackedPlacement { width, height, regions })
	}
}

#[cfg(test)]
mod tests {
	use crate::ptex::{PackedLayout, PtexError};

	#[test]
	fn regions_do_not_overlap_and_fit_bounds() {
		let sizes = [(4, 4), (8, 2), (2, 8), (16, 16), (4, 4), (1, 1), (32, 4), (4, 4)];
		let mut layout = PackedLayout::new(sizes.len());
		for (id, &(w, h)) in sizes.iter().enumerate() {
			layout.add(w, h, id).expect("add succeeds");
		}
		let placement = layout.finalize(4096).expect("finalize succeeds");

		assert_eq!(placement.regions.len(), sizes.len());
		for (id, region) in placement.regions.iter().enumerate() {
			assert_eq!((region.width, region.height), sizes[id]);
			assert!(region.x + region.width <= placement.width);
			assert!(region.y + region.height <= placement.height);
			for other in &placement.regions[id + 1..] {
				assert!(!region.overlaps(other), "{region:?} overlaps {other:?}");
			}
		}
	}

	#[test]
	fn packs_many_equal_items() {
		let mut layout = PackedLayout::new(64);
		for id in 0..64 {
			layout.add(16, 16, id).expect("add succeeds");
		}
		let placement = layout.finalize(1024).expect("finalize succeeds");
		let covered: u64 = placement.regions.iter().map(|r| r.area()).sum();
		assert_eq!(covered, 64 * 256);
		assert!(u64::from(placement.width) * u64::from(placement.height) >= covered);
	}

	#[test]
	fn grows_when_items_do_not_fit_initial_side() {
		// Area and largest side both suggest 32, but two 17-wide items need 34.
		let mut layout = PackedLayout::new(2);
		layout.add(17, 17, 0).expect("add succeeds");
		layout.add(17, 17, 1).expect("add succeeds");

		let placement = layout.finalize(64).expect("finalize grows");
		assert!(placement.width > 32 || placement.height > 32);
		assert!(!placement.regions[0].overlaps(&placement.regions[1]));
		assert!(matches!(layout.finalize(32), Err(PtexError::AtlasTooLarge { max_side: 32 })));
	}

	#[test]
	fn rejects_bad_ids_and_oversize() {
		let mut layout = PackedLayout::new(2);
		assert!(matches!(layout.add(1, 1, 2), Err(PtexError::LayoutIdOutOfRange { id: 2, len: 2 })));
		layout.add(1, 1, 0).expect("add succeeds");
		assert!(matches!(layout.add(1, 1, 0), Err(PtexError::DuplicateLayoutId { id: 0 })));
		assert!(matches!(layout.finalize(64), Err(PtexError::MissingLayoutId { id: 1 })));

		layout.add(128, 4, 1).expect("add succeeds");
		assert!(matches!(layout.finalize(64), Err(PtexError::AtlasTooLarge { max_side: 64 })));
		assert!(matches!(PackedLayout::new(0).finalize(64), Err(PtexError::EmptyLayout)));
	}
}
