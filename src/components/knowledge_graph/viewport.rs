use super::types::Point;

/// Factor applied by the zoom buttons.
pub const ZOOM_STEP: f64 = 1.2;
/// Factor applied per wheel notch.
pub const WHEEL_STEP: f64 = 1.1;
/// Smallest allowed scale.
pub const MIN_SCALE: f64 = 0.3;
/// Largest allowed scale.
pub const MAX_SCALE: f64 = 3.0;

/// Pan offset and zoom scale. Drawing applies `translate(offset)` then
/// `scale(scale)`; `screen_to_world` is the exact inverse.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Zoom, clamped to `[MIN_SCALE, MAX_SCALE]`.
	pub scale: f64,
	/// Screen-space translation.
	pub offset: Point,
}

impl Default for Viewport {
	fn default() -> Self {
		Self {
			scale: 1.0,
			offset: Point::default(),
		}
	}
}

impl Viewport {
	/// Multiplies the scale by `ZOOM_STEP`, up to `MAX_SCALE`.
	pub fn zoom_in(&mut self) {
		self.scale = (self.scale * ZOOM_STEP).min(MAX_SCALE);
	}

	/// Divides the scale by `ZOOM_STEP`, down to `MIN_SCALE`.
	pub fn zoom_out(&mut self) {
		self.scale = (self.scale / ZOOM_STEP).max(MIN_SCALE);
	}

	/// Scales by `factor` while keeping the world point under `anchor` fixed.
	pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
		let world = self.screen_to_world(anchor);
		self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
		self.offset = Point::new(
			anchor.x - world.x * self.scale,
			anchor.y - world.y * self.scale,
		);
	}

	/// Back to scale 1 and no offset.
	pub fn reset(&mut self) {
		*self = Self::default();
	}

	/// Shifts the offset by a screen-space delta.
	pub fn pan(&mut self, dx: f64, dy: f64) {
		self.offset.x += dx;
		self.offset.y += dy;
	}

	/// `(screen - offset) / scale`.
	pub fn screen_to_world(&self, screen: Point) -> Point {
		Point::new(
			(screen.x - self.offset.x) / self.scale,
			(screen.y - self.offset.y) / self.scale,
		)
	}

	/// `world * scale + offset`.
	pub fn world_to_screen(&self, world: Point) -> Point {
		Point::new(
			world.x * self.scale + self.offset.x,
			world.y * self.scale + self.offset.y,
		)
	}
}
