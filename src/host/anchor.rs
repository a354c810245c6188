use std::cell::Cell;
use super::{Constructable, Endpoint};
use crate::math::Vec3;

/// Named world anchor with a movable position
pub struct Anchor {
    name: String,
    position: Cell<Vec3>,
    construction: Option<Box<dyn Constructable>>,
}

impl Anchor {
    pub fn new(name: &str, position: Vec3) -> Self {
        Self {
            name: name.to_string(),
            position: Cell::new(position),
            construction: None,
        }
    }

    /// Give this anchor a construction capability
    pub fn with_construction(mut self, construction: impl Constructable + 'static) -> Self {
        self.construction = Some(Box::new(construction));
        self
    }

    pub fn set_position(&self, position: Vec3) {
        self.position.set(position);
    }
}

impl std::fmt::Debug for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Anchor")
            .field("name", &self.name)
            .field("position", &self.position.get())
            .field("constructable", &self.construction.is_some())
            .finish()
    }
}

impl Endpoint for Anchor {
    fn name(&self) -> &str {
        &self.name
    }

    fn world_position(&self) -> Vec3 {
        self.position.get()
    }

    fn constructable(&self) -> Option<&dyn Constructable> {
        self.construction.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    struct Counter(Rc<Cell<u32>>);

    impl Constructable for Counter {
        fn self_construct(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_anchor_position() {
        let anchor = Anchor::new("hall", Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(anchor.name(), "hall");
        assert_eq!(anchor.world_position(), Vec3::new(1.0, 2.0, 3.0));

        anchor.set_position(Vec3::ZERO);
        assert_eq!(anchor.world_position(), Vec3::ZERO);
    }

    #[test]
    fn test_construction_capability() {
        let plain = Anchor::new("plain", Vec3::ZERO);
        assert!(plain.constructable().is_none());

        let count = Rc::new(Cell::new(0));
        let site = Anchor::new("site", Vec3::ZERO).with_construction(Counter(count.clone()));
        site.constructable().unwrap().self_construct();
        assert_eq!(count.get(), 1);
    }
}
