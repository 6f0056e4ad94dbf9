//! Splitting slider content into inline and lightbox-only items.

use std::rc::Rc;

/// One piece of slider content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideItem<C> {
    pub content: C,
    /// Shown only inside the lightbox.
    pub lightbox_only: bool,
}

impl<C> SlideItem<C> {
    /// An inline item.
    pub fn new(content: C) -> Self {
        Self { content, lightbox_only: false }
    }

    /// A lightbox-only item.
    pub fn lightbox(content: C) -> Self {
        Self { content, lightbox_only: true }
    }
}

impl<C> From<C> for SlideItem<C> {
    fn from(content: C) -> Self {
        Self::new(content)
    }
}

/// Source positions of the main and lightbox-only items.
///
/// Positions index into the shared, never-mutated source slice; order within
/// each list follows source order.
#[derive(Debug, Clone)]
pub struct ContentPartition<C> {
    source: Rc<[SlideItem<C>]>,
    main: Vec<usize>,
    lightbox: Vec<usize>,
}

impl<C> ContentPartition<C> {
    pub fn source(&self) -> &Rc<[SlideItem<C>]> {
        &self.source
    }

    pub fn main_positions(&self) -> &[usize] {
        &self.main
    }

    pub fn lightbox_positions(&self) -> &[usize] {
        &self.lightbox
    }

    pub fn main_items(&self) -> impl Iterator<Item = &C> + '_ {
        self.main.iter().map(|&i| &self.source[i].content)
    }

    pub fn lightbox_items(&self) -> impl Iterator<Item = &C> + '_ {
        self.lightbox.iter().map(|&i| &self.source[i].content)
    }

    /// What the lightbox shows: the lightbox-only items, or the inline items
    /// when nothing is marked.
    pub fn lightbox_view(&self) -> &[usize] {
        if self.lightbox.is_empty() {
            &self.main
        } else {
            &self.lightbox
        }
    }

    /// Content at `position` of the lightbox view.
    pub fn lightbox_item(&self, position: usize) -> Option<&C> {
        let &i = self.lightbox_view().get(position)?;
        Some(&self.source[i].content)
    }

    /// Content at `position` of the inline body.
    pub fn main_item(&self, position: usize) -> Option<&C> {
        let &i = self.main.get(position)?;
        Some(&self.source[i].content)
    }

    pub fn main_len(&self) -> usize {
        self.main.len()
    }

    pub fn lightbox_len(&self) -> usize {
        self.lightbox_view().len()
    }
}

/// Split `source` by the lightbox marker.
pub fn partition_items<C>(source: Rc<[SlideItem<C>]>) -> ContentPartition<C> {
    let (lightbox, main): (Vec<usize>, Vec<usize>) =
        (0..source.len()).partition(|&i| source[i].lightbox_only);
    ContentPartition { source, main, lightbox }
}

/// Memoizes [`partition_items`] on the identity of the source slice.
#[derive(Debug)]
pub struct ChildPartitioner<C> {
    cached: Option<Rc<ContentPartition<C>>>,
}

impl<C> ChildPartitioner<C> {
    pub fn new() -> Self {
        Self { cached: None }
    }

    /// Partition `source`, reusing the previous result when it is the same
    /// allocation.
    pub fn partition(&mut self, source: &Rc<[SlideItem<C>]>) -> Rc<ContentPartition<C>> {
        if let Some(cached) = &self.cached {
            if Rc::ptr_eq(cached.source(), source) {
                return cached.clone();
            }
        }
        let partition = Rc::new(partition_items(source.clone()));
        tracing::trace!(
            target: "gilt_slider::partition",
            main = partition.main.len(),
            lightbox = partition.lightbox.len(),
            "partitioned"
        );
        self.cached = Some(partition.clone());
        partition
    }
}

impl<C> Default for ChildPartitioner<C> {
    fn default() -> Self {
        Self::new()
    }
}
