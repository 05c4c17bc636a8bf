//! Span helpers for the compile entry points.
//!
//! Enabled by the `tracing` feature. Applications install their own
//! subscriber; the library only opens spans.

#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use tracing::Span;

    pub fn table_query_span(entity_type: &str) -> Span {
        tracing::debug_span!("lifeguard.translate.table_query", entity = entity_type)
    }

    pub fn relation_span(entity_type: &str, property: &str) -> Span {
        tracing::debug_span!(
            "lifeguard.translate.relation",
            entity = entity_type,
            property = property
        )
    }

    pub fn insert_span(entity_type: &str) -> Span {
        tracing::debug_span!("lifeguard.translate.insert", entity = entity_type)
    }

    pub fn update_span(entity_type: &str) -> Span {
        tracing::debug_span!("lifeguard.translate.update", entity = entity_type)
    }

    pub fn delete_span(entity_type: &str) -> Span {
        tracing::debug_span!("lifeguard.translate.delete", entity = entity_type)
    }
}
