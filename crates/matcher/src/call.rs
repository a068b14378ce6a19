//! Positional arguments of one call, each tagged with its declared type.

use equate_core::ArgumentValue;
use std::any::TypeId;

/// One argument position.
///
/// The declared type is recorded separately from the value so an absent
/// argument still resolves against the comparers of its parameter type.
#[derive(Debug)]
pub struct ArgumentSlot {
    type_id: TypeId,
    type_name: &'static str,
    value: Option<Box<dyn ArgumentValue>>,
}

impl ArgumentSlot {
    pub fn of<T: ArgumentValue>(value: Option<T>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            value: value.map(|v| Box::new(v) as Box<dyn ArgumentValue>),
        }
    }

    pub fn some<T: ArgumentValue>(value: T) -> Self {
        Self::of(Some(value))
    }

    pub fn none<T: ArgumentValue>() -> Self {
        Self::of::<T>(None)
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn value(&self) -> Option<&dyn ArgumentValue> {
        self.value.as_deref()
    }
}

/// Arguments of a call, in parameter order.
#[derive(Debug, Default)]
pub struct CallArguments {
    slots: Vec<ArgumentSlot>,
}

impl CallArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a present argument of type `T`.
    pub fn with<T: ArgumentValue>(mut self, value: T) -> Self {
        self.slots.push(ArgumentSlot::some(value));
        self
    }

    pub fn with_slot(mut self, slot: ArgumentSlot) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn push(&mut self, slot: ArgumentSlot) {
        self.slots.push(slot);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArgumentSlot> {
        self.slots.iter()
    }
}

impl FromIterator<ArgumentSlot> for CallArguments {
    fn from_iter<I: IntoIterator<Item = ArgumentSlot>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_slot_keeps_declared_type() {
        let slot = ArgumentSlot::none::<String>();
        assert_eq!(slot.type_id(), TypeId::of::<String>());
        assert_eq!(slot.type_name(), "alloc::string::String");
        assert!(slot.value().is_none());
    }

    #[test]
    fn builder_appends_in_order() {
        let args = CallArguments::new()
            .with(1u8)
            .with_slot(ArgumentSlot::none::<String>())
            .with("x");
        let names: Vec<_> = args.iter().map(ArgumentSlot::type_name).collect();
        assert_eq!(names, vec!["u8", "alloc::string::String", "&str"]);
        assert_eq!(args.len(), 3);
    }
}
