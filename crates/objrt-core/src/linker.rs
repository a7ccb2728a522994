//! Class linker
//!
//! Linking resolves a class's superclass by name, records it in the
//! superclass's subclass list (and does the same for the metaclass pair), and
//! finalizes the instance layout by sliding the class's own ivars past the
//! superclass's finalized size. A class whose superclass is not registered yet
//! stays unlinked; linking is retried on the next request.

use crate::class::{Class, ClassGraph, ClassInfo, Layout};
use tracing::{debug, trace, warn};

impl ClassGraph {
    /// Link a class and every unlinked ancestor, root first
    ///
    /// `index` must be an instance-side record. Returns whether the class is
    /// linked afterwards. Redundant calls are cheap and have no effect.
    pub(crate) fn setup_class(&mut self, index: usize) -> bool {
        if self.records[index].class.is_linked() {
            return true;
        }

        // (class, resolved superclass) pairs, leaf first
        let mut links: Vec<(usize, Option<usize>)> = Vec::new();
        let mut current = index;
        loop {
            let superclass = match &self.records[current].superclass_name {
                None => None,
                Some(name) => match self.table.get(name) {
                    Some(superclass) => Some(superclass),
                    None => {
                        trace!(
                            class = %self.records[index].class.name(),
                            missing = %name,
                            "superclass not registered, deferring link"
                        );
                        return false;
                    }
                },
            };
            links.push((current, superclass));

            match superclass {
                Some(superclass) if !self.records[superclass].class.is_linked() => {
                    assert!(
                        !links.iter().any(|(class, _)| *class == superclass),
                        "class hierarchy cycle through {}",
                        self.records[superclass].class.name()
                    );
                    current = superclass;
                }
                _ => break,
            }
        }

        for (class, superclass) in links.into_iter().rev() {
            self.link(class, superclass);
        }
        true
    }

    fn link(&mut self, index: usize, superclass: Option<usize>) {
        let meta = self.records[index].pair;

        match superclass {
            Some(superclass) => {
                let super_meta = self.records[superclass].pair;
                self.records[index].superclass = Some(superclass);
                self.records[meta].superclass = Some(super_meta);
                self.add_subclass(superclass, index);
                self.add_subclass(super_meta, meta);
            }
            // The root metaclass inherits from the root class itself
            None => self.records[meta].superclass = Some(index),
        }

        let mut slide = superclass
            .map(|superclass| {
                let size = self.records[superclass].class.finalized_size();
                layout_offset(size, &self.records[index].class)
            })
            .unwrap_or(0);
        let warn_legacy = self.warn_legacy_offsets;
        let record = &mut self.records[index];
        let declared = match record.layout {
            Layout::Declared(size) | Layout::Finalized(size) => size,
        };

        if slide != 0 {
            if let Some(first) = record.ivars.first() {
                if first.offset() < 0 {
                    if warn_legacy {
                        warn!(
                            class = %record.class.name(),
                            ivar = first.name(),
                            offset = first.offset(),
                            "first ivar has a negative offset, widening layout slide"
                        );
                    } else {
                        debug!(
                            class = %record.class.name(),
                            ivar = first.name(),
                            offset = first.offset(),
                            "first ivar has a negative offset, widening layout slide"
                        );
                    }
                    slide = slide
                        .checked_sub(first.offset())
                        .unwrap_or_else(|| layout_overflow(&record.class));
                }
            }
            for ivar in &mut record.ivars {
                ivar.slide(slide);
            }
        }

        let size = i64::try_from(declared)
            .ok()
            .and_then(|declared| declared.checked_add(slide))
            .and_then(|size| usize::try_from(size).ok())
            .unwrap_or_else(|| layout_overflow(&record.class));
        record.layout = Layout::Finalized(size);
        record.class.publish_size(size);
        record.class.insert_info(ClassInfo::LINKED);
        self.records[meta].class.insert_info(ClassInfo::LINKED);

        trace!(
            class = %self.records[index].class.name(),
            size,
            slide,
            "linked class"
        );
    }

    fn add_subclass(&mut self, superclass: usize, subclass: usize) {
        self.records[superclass].subclasses.push(subclass);
    }
}

fn layout_offset(size: usize, class: &Class) -> i64 {
    i64::try_from(size).unwrap_or_else(|_| layout_overflow(class))
}

/// A layout that does not fit the address space is unrecoverable
fn layout_overflow(class: &Class) -> ! {
    panic!("instance layout of {} overflows", class.name())
}
