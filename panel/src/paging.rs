/// Server-driven pagination position.
///
/// `page_number` always stays within `0..=maximum_pages`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageState {
    page_number: u32,
    maximum_pages: u32,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn maximum_pages(&self) -> u32 {
        self.maximum_pages
    }

    /// Moves by `delta` pages, clamped to `[0, maximum_pages]`. Returns the new page.
    pub fn increment(&mut self, delta: i64) -> u32 {
        let target = (self.page_number as i64).saturating_add(delta);
        self.page_number = target.clamp(0, self.maximum_pages as i64) as u32;
        self.page_number
    }

    /// Records the page count reported by the service, pulling the page number back in range.
    pub fn set_maximum_pages(&mut self, maximum_pages: u32) {
        self.maximum_pages = maximum_pages;
        self.page_number = self.page_number.min(maximum_pages);
    }
}
