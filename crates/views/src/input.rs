use crate::error::{Result, ViewError};

/// Stackable input suppression.
///
/// Every disable must be paired with one enable; input comes back only when the
/// last disable is released.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputGate {
	disables: u32,
}

impl InputGate {
	pub fn is_enabled(&self) -> bool {
		self.disables == 0
	}

	/// Number of outstanding disables.
	pub fn depth(&self) -> u32 {
		self.disables
	}

	/// Applies one toggle. Returns the new effective flag when it flipped.
	pub fn toggle(&mut self, enabled: bool) -> Result<Option<bool>> {
		if enabled {
			let Some(remaining) = self.disables.checked_sub(1) else {
				return Err(ViewError::InputUnderflow);
			};
			self.disables = remaining;
			Ok((remaining == 0).then_some(true))
		} else {
			self.disables = self.disables.saturating_add(1);
			Ok((self.disables == 1).then_some(false))
		}
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	#[test]
	fn nested_disables_need_matching_enables() {
		let mut gate = InputGate::default();
		assert_eq!(gate.toggle(false), Ok(Some(false)));
		assert_eq!(gate.toggle(false), Ok(None));
		assert_eq!(gate.toggle(true), Ok(None));
		assert!(!gate.is_enabled());
		assert_eq!(gate.toggle(true), Ok(Some(true)));
		assert!(gate.is_enabled());
	}

	#[test]
	fn enable_without_disable_is_rejected() {
		let mut gate = InputGate::default();
		assert_eq!(gate.toggle(true), Err(ViewError::InputUnderflow));
		assert_eq!(gate.depth(), 0);
		assert!(gate.is_enabled());
	}

	proptest! {
		#[test]
		fn enabled_iff_balanced(toggles in proptest::collection::vec(any::<bool>(), 0..64)) {
			let mut gate = InputGate::default();
			let mut depth: u32 = 0;
			for enabled in toggles {
				let result = gate.toggle(enabled);
				if enabled && depth == 0 {
					prop_assert_eq!(result, Err(ViewError::InputUnderflow));
					continue;
				}
				prop_assert!(result.is_ok());
				if enabled { depth -= 1 } else { depth += 1 }
				prop_assert_eq!(gate.depth(), depth);
				prop_assert_eq!(gate.is_enabled(), depth == 0);
			}
		}
	}
}
