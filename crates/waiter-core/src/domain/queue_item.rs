//! QueueItem - Event Queue を流れる型消去済み Notification
//!
//! 優先度や delivery id は持たない。tag と値だけ。

use std::any::Any;
use std::fmt;

use super::message::Notification;
use super::type_tag::TypeTag;

pub struct QueueItem {
    tag: TypeTag,
    notification: Box<dyn Any + Send + Sync>,
}

impl QueueItem {
    pub fn new<N: Notification>(notification: N) -> Self {
        Self {
            tag: TypeTag::of::<N>(),
            notification: Box::new(notification),
        }
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn notification(&self) -> &(dyn Any + Send + Sync) {
        self.notification.as_ref()
    }

    pub fn downcast_ref<N: Notification>(&self) -> Option<&N> {
        self.notification.downcast_ref::<N>()
    }
}

impl fmt::Debug for QueueItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueItem")
            .field("notification_type", &self.tag.name())
            .finish_non_exhaustive()
    }
}
