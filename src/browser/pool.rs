// src/browser/pool.rs
// =============================================================================
// A fixed-size pool of tabs.
//
// All tabs are opened up front. The crawler checks a tab out for exactly one
// navigation and checks it back in afterwards, so the pool size is also the
// maximum number of pages being loaded at the same time.
//
// Tabs rotate FIFO: checkout takes from the front, checkin returns to the back.
// =============================================================================

use super::{Browser, Tab};
use crate::error::CheckError;
use futures::future::join_all;
use std::collections::VecDeque;
use tracing::debug;

pub struct TabPool<T: Tab> {
    idle: VecDeque<T>,
    size: usize,
}

impl<T: Tab> TabPool<T> {
    /// Opens `size` tabs. If any tab fails to open, the ones already opened
    /// are closed before the error is returned.
    pub async fn open<B>(browser: &B, size: usize) -> Result<Self, CheckError>
    where
        B: Browser<Tab = T>,
    {
        let mut pool = TabPool {
            idle: VecDeque::with_capacity(size),
            size,
        };

        for _ in 0..size {
            match browser.new_tab().await {
                Ok(tab) => pool.idle.push_back(tab),
                Err(e) => {
                    pool.close_all().await;
                    return Err(e);
                }
            }
        }

        debug!(size, "tab pool opened");
        Ok(pool)
    }

    pub fn checkout(&mut self) -> Option<T> {
        self.idle.pop_front()
    }

    pub fn checkin(&mut self, tab: T) {
        self.idle.push_back(tab);
    }

    /// Tabs currently available for checkout.
    pub fn idle(&self) -> usize {
        self.idle.len()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Closes every idle tab. Tabs still checked out are the caller's to
    /// return first.
    pub async fn close_all(&mut self) {
        let count = self.idle.len();
        join_all(self.idle.iter_mut().map(|tab| tab.close())).await;
        self.idle.clear();
        debug!(count, "tab pool closed");
    }
}
