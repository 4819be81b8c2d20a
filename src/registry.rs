//! Session scoped mapping from type oid to codec.
use lru::LruCache;
use std::{any::TypeId, collections::HashMap, num::NonZeroUsize, rc::Rc};

use crate::{
    codec::{Codec, TextCodec},
    common::{span, verbose},
    encode::{Encode, EncodePlan},
    postgres::{FormatCode, Oid, oid},
    scan::{ScanPlan, ScanTarget},
};

const DEFAULT_PLAN_CACHE: NonZeroUsize = NonZeroUsize::new(64).unwrap();

/// Key of a memoized plan: wire type, format, and concrete native shape.
type PlanKey = (Oid, FormatCode, TypeId);

/// Type oid to codec table for one session.
///
/// The registry owns one codec per wire type and memoizes resolved plans,
/// so iterating a result set pays shape dispatch once per column rather
/// than once per row. It is populated by the surrounding driver, commonly
/// from the server catalog, and is owned by a single connection: plan
/// memoization takes `&mut self` and nothing here is synchronized.
pub struct TypeRegistry {
    codecs: HashMap<Oid, Rc<dyn Codec>>,
    encode_plans: LruCache<PlanKey, Rc<dyn EncodePlan>>,
    scan_plans: LruCache<PlanKey, Rc<dyn ScanPlan>>,
}

impl TypeRegistry {
    /// Registry preloaded with the character string family, all served by
    /// one shared [`TextCodec`].
    pub fn new() -> TypeRegistry {
        let mut registry = TypeRegistry {
            codecs: HashMap::new(),
            encode_plans: LruCache::new(DEFAULT_PLAN_CACHE),
            scan_plans: LruCache::new(DEFAULT_PLAN_CACHE),
        };

        let text: Rc<dyn Codec> = Rc::new(TextCodec);
        let character_family = [
            oid::NAME,
            oid::TEXT,
            oid::UNKNOWN,
            oid::ACLITEM,
            oid::BPCHAR,
            oid::VARCHAR,
            oid::CSTRING,
        ];
        for oid in character_family {
            registry.codecs.insert(oid, Rc::clone(&text));
        }

        registry
    }

    /// Register `codec` for `oid`, replacing any previous registration.
    ///
    /// Plans memoized for a replaced codec are dropped so they cannot
    /// outlive its registration.
    pub fn register(&mut self, oid: Oid, codec: impl Codec + 'static) {
        verbose!("registering codec for oid {oid}");
        self.codecs.insert(oid, Rc::new(codec));
        self.encode_plans.clear();
        self.scan_plans.clear();
    }

    /// Resolve the codec registered for `oid`.
    ///
    /// Unknown oids are the caller's concern; the registry only reports
    /// them.
    pub fn lookup(&self, oid: Oid) -> Option<&dyn Codec> {
        self.codecs.get(&oid).map(|codec| &**codec)
    }

    /// Resolve an encode plan for the shape of `value`, memoized by
    /// `(oid, format, shape)`.
    pub fn encode_plan(&mut self, oid: Oid, format: FormatCode, value: &dyn Encode)
        -> Option<Rc<dyn EncodePlan>>
    {
        span!("encode_plan", oid);
        let key = (oid, format, value.as_any().type_id());
        if let Some(plan) = self.encode_plans.get(&key) {
            return Some(Rc::clone(plan));
        }

        let plan: Rc<dyn EncodePlan> = self.codecs.get(&oid)?.resolve_encode(format, value)?.into();
        verbose!("memoized encode plan for oid {oid}");
        self.encode_plans.put(key, Rc::clone(&plan));
        Some(plan)
    }

    /// Resolve a scan plan for the shape of `target`, memoized by
    /// `(oid, format, shape)`.
    pub fn scan_plan(&mut self, oid: Oid, format: FormatCode, target: &mut dyn ScanTarget)
        -> Option<Rc<dyn ScanPlan>>
    {
        span!("scan_plan", oid);
        let key = (oid, format, target.as_any_mut().type_id());
        if let Some(plan) = self.scan_plans.get(&key) {
            return Some(Rc::clone(plan));
        }

        let plan: Rc<dyn ScanPlan> = self.codecs.get(&oid)?.resolve_scan(format, target)?.into();
        verbose!("memoized scan plan for oid {oid}");
        self.scan_plans.put(key, Rc::clone(&plan));
        Some(plan)
    }
}

impl Default for TypeRegistry {
    fn default() -> TypeRegistry {
        TypeRegistry::new()
    }
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use super::TypeRegistry;
    use crate::{
        codec::EnumCodec,
        postgres::{FormatCode, oid},
    };

    #[test]
    fn character_family_is_preloaded_and_unknown_oids_are_not() {
        let registry = TypeRegistry::new();
        assert!(registry.lookup(oid::TEXT).is_some());
        assert!(registry.lookup(oid::BPCHAR).is_some());
        // bool is not a character type
        assert!(registry.lookup(16).is_none());
    }

    #[test]
    fn memoized_scan_plans_are_reused_per_shape() {
        let mut registry = TypeRegistry::new();
        let mut out = String::new();
        let a = registry.scan_plan(oid::TEXT, FormatCode::Text, &mut out).unwrap();
        let b = registry.scan_plan(oid::TEXT, FormatCode::Text, &mut out).unwrap();
        assert!(Rc::ptr_eq(&a, &b));

        // a different destination shape resolves its own plan
        let mut buf = Vec::new();
        let c = registry.scan_plan(oid::TEXT, FormatCode::Text, &mut buf).unwrap();
        assert!(!Rc::ptr_eq(&a, &c));
    }

    #[test]
    fn memoized_encode_plans_are_reused_per_shape() {
        let mut registry = TypeRegistry::new();
        let value = String::from("x");
        let a = registry.encode_plan(oid::TEXT, FormatCode::Text, &value).unwrap();
        let b = registry.encode_plan(oid::TEXT, FormatCode::Binary, &value).unwrap();
        let c = registry.encode_plan(oid::TEXT, FormatCode::Text, &value).unwrap();
        assert!(Rc::ptr_eq(&a, &c));
        assert!(!Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn register_replaces_the_codec_and_drops_stale_plans() {
        let mut registry = TypeRegistry::new();
        let mut out = String::new();
        let stale = registry.scan_plan(oid::TEXT, FormatCode::Text, &mut out).unwrap();

        registry.register(oid::TEXT, EnumCodec::default());
        let fresh = registry.scan_plan(oid::TEXT, FormatCode::Text, &mut out).unwrap();
        assert!(!Rc::ptr_eq(&stale, &fresh));
    }

    #[test]
    fn plans_from_the_registry_convert() {
        let mut registry = TypeRegistry::new();

        let value = String::from("foo");
        let encoded = registry
            .encode_plan(oid::VARCHAR, FormatCode::Binary, &value)
            .unwrap()
            .encode(&value)
            .unwrap();

        let mut out = String::new();
        registry
            .scan_plan(oid::VARCHAR, FormatCode::Binary, &mut out)
            .unwrap()
            .scan(encoded.as_deref(), &mut out)
            .unwrap();
        assert_eq!(out, "foo");
    }
}
