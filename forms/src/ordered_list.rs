//! The ordered sub-entity list editor behind every form that edits a list of
//! ingredients, steps or resources.
//!
//! Every operation keeps `order` as the contiguous sequence `1..=len`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub trait ListItem: Clone {
    type Field: Copy;

    fn id(&self) -> Uuid;

    /// A fresh, empty record for `add`.
    fn blank(id: Uuid, order: u32) -> Self;

    fn set_order(&mut self, order: u32);

    /// Writes `value` into `field`. Returns `false` when the value is
    /// rejected, in which case `self` must be left untouched.
    fn set_field(&mut self, field: Self::Field, value: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedList<T> {
    items: Vec<T>,
    #[serde(default)]
    minimum: usize,
}

impl<T: ListItem> Default for OrderedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ListItem> OrderedList<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            minimum: 0,
        }
    }

    /// A list that starts with `minimum` blank records and never shrinks
    /// below that length.
    pub fn with_minimum(minimum: usize) -> Self {
        let mut list = Self {
            items: Vec::with_capacity(minimum),
            minimum,
        };
        while list.items.len() < minimum {
            list.add();
        }
        list
    }

    /// Wraps existing records, renumbering them in the given order. Blank
    /// records are appended if `items` is shorter than `minimum`.
    pub fn from_items(items: Vec<T>, minimum: usize) -> Self {
        let mut list = Self { items, minimum };
        list.reindex();
        while list.items.len() < minimum {
            list.add();
        }
        list
    }

    pub fn add(&mut self) -> Uuid {
        let id = Uuid::new_v4();
        let order = u32::try_from(self.items.len() + 1).unwrap_or(u32::MAX);
        self.items.push(T::blank(id, order));
        id
    }

    /// Returns `true` if a record was removed. Unknown ids and removals that
    /// would drop below the minimum are no-ops.
    pub fn remove(&mut self, id: Uuid) -> bool {
        if self.items.len() <= self.minimum {
            return false;
        }

        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        if self.items.len() == before {
            return false;
        }

        self.reindex();
        true
    }

    /// Replaces the matching record with a copy that has `field` set to
    /// `value`. Input the record rejects is dropped silently.
    pub fn update(&mut self, id: Uuid, field: T::Field, value: &str) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };

        let mut updated = self.items[position].clone();
        if !updated.set_field(field, value) {
            return false;
        }

        self.items[position] = updated;
        true
    }

    pub fn move_up(&mut self, id: Uuid) -> bool {
        match self.position(id) {
            Some(position) if position > 0 => {
                self.items.swap(position, position - 1);
                self.reindex();
                true
            }
            _ => false,
        }
    }

    pub fn move_down(&mut self, id: Uuid) -> bool {
        match self.position(id) {
            Some(position) if position + 1 < self.items.len() => {
                self.items.swap(position, position + 1);
                self.reindex();
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn minimum(&self) -> usize {
        self.minimum
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// The list as submitted: every record, in order.
    pub fn into_dto<D>(self) -> Vec<D>
    where
        T: Into<D>,
    {
        self.items.into_iter().map(Into::into).collect()
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn reindex(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.set_order(u32::try_from(index + 1).unwrap_or(u32::MAX));
        }
    }
}

impl<'a, T: ListItem> IntoIterator for &'a OrderedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Line {
        id: Uuid,
        order: u32,
        text: String,
    }

    #[derive(Debug, Clone, Copy)]
    enum LineField {
        Text,
    }

    impl ListItem for Line {
        type Field = LineField;

        fn id(&self) -> Uuid {
            self.id
        }

        fn blank(id: Uuid, order: u32) -> Self {
            Line {
                id,
                order,
                text: String::new(),
            }
        }

        fn set_order(&mut self, order: u32) {
            self.order = order;
        }

        fn set_field(&mut self, field: LineField, value: &str) -> bool {
            match field {
                LineField::Text if value.chars().all(|c| c.is_alphabetic() || c == ' ') => {
                    self.text = value.to_string();
                    true
                }
                LineField::Text => false,
            }
        }
    }

    fn orders(list: &OrderedList<Line>) -> Vec<u32> {
        list.iter().map(|l| l.order).collect()
    }

    #[test]
    fn add_appends_with_next_order() {
        let mut list = OrderedList::<Line>::new();
        let first = list.add();
        let second = list.add();

        assert_ne!(first, second);
        assert_eq!(orders(&list), vec![1, 2]);
        assert_eq!(list.as_slice()[1].id, second);
    }

    #[test]
    fn removing_a_middle_item_reindexes_contiguously() {
        let mut list = OrderedList::<Line>::new();
        let ids: Vec<Uuid> = (0..4).map(|_| list.add()).collect();

        assert!(list.remove(ids[1]));

        assert_eq!(orders(&list), vec![1, 2, 3]);
        let remaining: Vec<Uuid> = list.iter().map(|l| l.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2], ids[3]]);
    }

    #[test]
    fn remove_is_blocked_at_the_minimum() {
        let mut list = OrderedList::<Line>::with_minimum(1);
        assert_eq!(list.len(), 1);

        let only = list.as_slice()[0].id;
        assert!(!list.remove(only));
        assert_eq!(list.len(), 1);

        let second = list.add();
        assert!(list.remove(only));
        assert_eq!(list.as_slice()[0].id, second);
        assert_eq!(orders(&list), vec![1]);
    }

    #[test]
    fn removing_an_unknown_id_changes_nothing() {
        let mut list = OrderedList::<Line>::new();
        list.add();
        let before = list.clone();

        assert!(!list.remove(Uuid::new_v4()));
        assert_eq!(list, before);
    }

    #[test]
    fn rejected_updates_leave_the_record_alone() {
        let mut list = OrderedList::<Line>::new();
        let id = list.add();

        assert!(list.update(id, LineField::Text, "fresh basil"));
        assert!(!list.update(id, LineField::Text, "basil 2"));

        assert_eq!(list.get(id).unwrap().text, "fresh basil");
    }

    #[test]
    fn moving_items_swaps_and_reindexes() {
        let mut list = OrderedList::<Line>::new();
        let a = list.add();
        let b = list.add();
        let c = list.add();

        assert!(list.move_up(c));
        assert!(!list.move_up(a));
        assert!(list.move_down(a));
        assert!(!list.move_down(a));

        let ids: Vec<Uuid> = list.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![c, b, a]);
        assert_eq!(orders(&list), vec![1, 2, 3]);
    }

    #[test]
    fn from_items_renumbers_and_pads_to_minimum() {
        let items = vec![Line {
            id: Uuid::new_v4(),
            order: 7,
            text: "knead".into(),
        }];

        let list = OrderedList::from_items(items, 2);
        assert_eq!(list.len(), 2);
        assert_eq!(orders(&list), vec![1, 2]);
        assert_eq!(list.as_slice()[0].text, "knead");
    }
}
