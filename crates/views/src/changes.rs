bitflags::bitflags! {
	/// What the manager changed since the host last asked.
	///
	/// Returned by [`ViewManager::pump`](crate::ViewManager::pump) and
	/// [`ViewManager::advance`](crate::ViewManager::advance).
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct Changes: u8 {
		/// A slot gained or lost an occupant.
		const OCCUPANCY = 1 << 0;
		/// Backdrop placement, visibility or alpha changed.
		const BACKDROP = 1 << 1;
		/// A scene change resolved.
		const SCENE = 1 << 2;
		/// The effective input flag flipped.
		const INPUT = 1 << 3;
	}
}

impl Changes {
	pub const NONE: Self = Self::empty();

	/// True if anything visible changed.
	pub fn needs_redraw(self) -> bool {
		self.intersects(Self::OCCUPANCY | Self::BACKDROP)
	}
}
