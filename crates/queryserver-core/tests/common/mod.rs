#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use queryserver_core::{
    BoxError, Configuration, ConnectionMetaFactory, Meta, MetaProviders, MetaVariant,
    MetricsSystem, PropertyBag, UrlResolver,
};

/// Provider handle recording what the factory built it with.
#[derive(Debug)]
pub struct RecordedMeta {
    pub variant: MetaVariant,
    pub url: String,
    pub properties: PropertyBag,
}

impl Meta for RecordedMeta {
    fn variant(&self) -> MetaVariant {
        self.variant
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn properties(&self) -> &PropertyBag {
        &self.properties
    }
}

/// Provider constructors that record calls and can be told to fail.
#[derive(Default)]
pub struct RecordingProviders {
    pub plain_calls: AtomicUsize,
    pub instrumented_calls: AtomicUsize,
    pub fail_with: Option<&'static str>,
}

impl RecordingProviders {
    pub fn failing(message: &'static str) -> Self {
        Self {
            fail_with: Some(message),
            ..Self::default()
        }
    }

    pub fn total_calls(&self) -> usize {
        self.plain_calls.load(Ordering::SeqCst) + self.instrumented_calls.load(Ordering::SeqCst)
    }

    fn build(
        &self,
        variant: MetaVariant,
        url: &str,
        properties: PropertyBag,
    ) -> Result<Box<dyn Meta>, BoxError> {
        if let Some(message) = self.fail_with {
            return Err(message.into());
        }
        Ok(Box::new(RecordedMeta {
            variant,
            url: url.to_string(),
            properties,
        }))
    }
}

impl MetaProviders for RecordingProviders {
    fn plain(&self, url: &str, properties: PropertyBag) -> Result<Box<dyn Meta>, BoxError> {
        self.plain_calls.fetch_add(1, Ordering::SeqCst);
        self.build(MetaVariant::Plain, url, properties)
    }

    fn instrumented(&self, url: &str, properties: PropertyBag) -> Result<Box<dyn Meta>, BoxError> {
        self.instrumented_calls.fetch_add(1, Ordering::SeqCst);
        self.build(MetaVariant::Instrumented, url, properties)
    }
}

/// URL resolver that records the property bag it was given.
pub struct RecordingResolver {
    pub url: Result<String, &'static str>,
    pub seen: Mutex<Vec<PropertyBag>>,
}

impl RecordingResolver {
    pub fn returning(url: &str) -> Self {
        Self {
            url: Ok(url.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &'static str) -> Self {
        Self {
            url: Err(message),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl UrlResolver for RecordingResolver {
    fn resolve_url(
        &self,
        properties: &PropertyBag,
        _conf: &Configuration,
    ) -> Result<String, BoxError> {
        self.seen.lock().unwrap().push(properties.clone());
        match &self.url {
            Ok(url) => Ok(url.clone()),
            Err(message) => Err((*message).into()),
        }
    }
}

/// Fixed metrics settings.
pub struct FixedMetrics;

impl MetricsSystem for FixedMetrics {
    fn reporting_interval(&self, _conf: &Configuration) -> u64 {
        2_500
    }

    fn sink_file_name(&self, _conf: &Configuration) -> String {
        "/tmp/pqs-test.json".to_string()
    }

    fn sink_type(&self, _conf: &Configuration) -> String {
        "file".to_string()
    }
}

pub struct Harness {
    pub factory: ConnectionMetaFactory,
    pub providers: Arc<RecordingProviders>,
    pub resolver: Arc<RecordingResolver>,
}

/// Builds a factory over `conf` with recording collaborators.
pub fn harness(conf: Option<Configuration>) -> Harness {
    harness_with(
        conf,
        RecordingProviders::default(),
        RecordingResolver::returning("jdbc:resolved:url"),
    )
}

pub fn harness_with(
    conf: Option<Configuration>,
    providers: RecordingProviders,
    resolver: RecordingResolver,
) -> Harness {
    let providers = Arc::new(providers);
    let resolver = Arc::new(resolver);
    let factory = ConnectionMetaFactory::with_configuration(conf, providers.clone())
        .with_url_resolver(resolver.clone())
        .with_metrics_system(Arc::new(FixedMetrics));
    Harness {
        factory,
        providers,
        resolver,
    }
}

pub fn config(entries: &[(&str, &str)]) -> Configuration {
    entries.iter().copied().collect()
}
