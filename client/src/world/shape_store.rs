use tabletop_shared::LocalId;

/// Read access to the application's shape store.
///
/// Shapes are owned outside of this crate. The core only ever asks whether a
/// shape is present, whether it is a token, and which shape (if any) is its
/// composite parent.
pub trait ShapeStore {
    /// Returns true if a live shape object exists for this id
    fn has_shape(&self, local: &LocalId) -> bool;
    /// Returns true if the shape exists and is a token. Missing shapes are not tokens.
    fn is_token(&self, local: &LocalId) -> bool;
    /// Composite parent of this shape, if it is a composite child
    fn composite_parent(&self, local: &LocalId) -> Option<LocalId>;
}

/// Mutable access to the application's shape store.
pub trait ShapeStoreMut: ShapeStore {
    /// Ask the renderer to redraw the shape
    fn invalidate(&mut self, local: &LocalId, skip_light_update: bool);
}

impl<T: ShapeStore + ?Sized> ShapeStore for &T {
    fn has_shape(&self, local: &LocalId) -> bool {
        (**self).has_shape(local)
    }

    fn is_token(&self, local: &LocalId) -> bool {
        (**self).is_token(local)
    }

    fn composite_parent(&self, local: &LocalId) -> Option<LocalId> {
        (**self).composite_parent(local)
    }
}

impl<T: ShapeStore + ?Sized> ShapeStore for &mut T {
    fn has_shape(&self, local: &LocalId) -> bool {
        (**self).has_shape(local)
    }

    fn is_token(&self, local: &LocalId) -> bool {
        (**self).is_token(local)
    }

    fn composite_parent(&self, local: &LocalId) -> Option<LocalId> {
        (**self).composite_parent(local)
    }
}

impl<T: ShapeStoreMut + ?Sized> ShapeStoreMut for &mut T {
    fn invalidate(&mut self, local: &LocalId, skip_light_update: bool) {
        (**self).invalidate(local, skip_light_update)
    }
}
