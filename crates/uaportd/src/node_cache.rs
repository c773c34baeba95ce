//! Read-only view over the node paths cached by the endpoint driver.

use crate::driver::EndpointDriver;

/// Borrowed view of the driver's node cache for the duration of one command.
#[derive(Debug)]
pub struct NodeCache<'a, D: ?Sized> {
    driver: &'a D,
}

impl<'a, D: EndpointDriver + ?Sized> NodeCache<'a, D> {
    /// Creates a view over `driver`'s cache.
    pub const fn new(driver: &'a D) -> Self {
        Self { driver }
    }

    /// All cached paths in driver order. Each call takes a fresh snapshot.
    pub fn enumerate(&self) -> impl Iterator<Item = String> + use<'a, D> {
        self.driver.cached_paths().into_iter()
    }

    /// Cached paths containing `needle`, compared case-sensitively, in
    /// driver order. An empty needle matches every path.
    pub fn search<'n>(&self, needle: &'n str) -> impl Iterator<Item = String> + use<'a, 'n, D> {
        self.enumerate().filter(move |path| path.contains(needle))
    }
}
