//! TypeTag - 型 identity をレジストリのキーとして扱う
//!
//! `TypeId` だけだとログやエラーで読めないので、`type_name` を一緒に持ち歩く。
//! 比較と hash は `TypeId` のみで行う。

use std::any::{self, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Request / Notification の型を表すタグ。
///
/// # 使用例
/// ```ignore
/// let tag = TypeTag::of::<Echo>();
/// assert_eq!(tag.short_name(), "Echo");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name (`my_app::orders::PlaceOrder`).
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment without generic arguments (`PlaceOrder`).
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Alpha;
    struct Beta;
    struct Wrapper<T>(T);

    #[test]
    fn same_type_yields_equal_tags() {
        assert_eq!(TypeTag::of::<Alpha>(), TypeTag::of::<Alpha>());
        assert_ne!(TypeTag::of::<Alpha>(), TypeTag::of::<Beta>());
    }

    #[test]
    fn tags_work_as_hash_keys() {
        let mut set = HashSet::new();
        set.insert(TypeTag::of::<Alpha>());
        set.insert(TypeTag::of::<Alpha>());
        set.insert(TypeTag::of::<Beta>());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn short_name_strips_path_and_generics() {
        assert_eq!(TypeTag::of::<Alpha>().short_name(), "Alpha");
        assert_eq!(TypeTag::of::<Wrapper<Beta>>().short_name(), "Wrapper");
        assert!(TypeTag::of::<Alpha>().name().ends_with("::Alpha"));
    }

    #[test]
    fn display_uses_full_name() {
        let tag = TypeTag::of::<Beta>();
        assert_eq!(tag.to_string(), tag.name());
    }
}
