//! Periodic detection and remediation of Pod IPs that overlap Service IPs

use std::fmt;
use std::sync::Arc;

use overlap_api::{Pod, Service};
use overlap_kube::ClusterApi;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{error_chain, ReconcileError, ReconcilerConfig, Result, ServiceIpIndex};

/// A Pod whose IP equals a Service's virtual IP
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collision {
    pub service: Service,
    pub pod: Pod,
}

impl Collision {
    pub fn ip(&self) -> &str {
        &self.pod.ip
    }
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} and {} overlap ({})", self.service, self.pod, self.pod.ip)
    }
}

/// Compare every Pod against the Service IPs, in Pod list order
pub fn detect_collisions(services: &[Service], pods: &[Pod]) -> Vec<Collision> {
    let index = ServiceIpIndex::build(services);
    collisions_in(&index, pods)
}

fn collisions_in(index: &ServiceIpIndex<'_>, pods: &[Pod]) -> Vec<Collision> {
    pods.iter()
        .filter_map(|pod| {
            index.get(&pod.ip).map(|svc| Collision {
                service: svc.clone(),
                pod: pod.clone(),
            })
        })
        .collect()
}

/// Outcome of one reconcile tick
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub services: usize,
    pub pods: usize,
    pub collisions: Vec<Collision>,
    pub deleted: usize,
    pub delete_failures: usize,
}

/// OverlapReconciler lists Services and Pods on a fixed interval and reports,
/// or deletes, Pods holding a Service IP
pub struct OverlapReconciler {
    api: Arc<dyn ClusterApi>,
    config: ReconcilerConfig,
}

impl OverlapReconciler {
    pub fn new(api: Arc<dyn ClusterApi>, config: ReconcilerConfig) -> Self {
        Self { api, config }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Wait an interval, reconcile, repeat until `cancel` fires
    ///
    /// Cancellation interrupts the wait but never a tick in progress.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            interval = ?self.config.interval,
            delete_overlapped_pods = self.config.delete_overlapped_pods,
            "Starting overlap reconciliation"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Shutdown requested, stopping overlap reconciliation");
                    return;
                }
                _ = tokio::time::sleep(self.config.interval) => {}
            }

            match self.reconcile_once().await {
                Ok(report) => debug!(
                    services = report.services,
                    pods = report.pods,
                    collisions = report.collisions.len(),
                    deleted = report.deleted,
                    delete_failures = report.delete_failures,
                    "Reconcile tick complete"
                ),
                Err(e) => error!("{}", error_chain(&e)),
            }
        }
    }

    /// One pass: list Services, index them, list Pods, report and remediate
    ///
    /// Any listing failure abandons the pass before a single Pod is touched.
    pub async fn reconcile_once(&self) -> Result<TickReport> {
        let services = self
            .api
            .list_services()
            .await
            .map_err(ReconcileError::ListServices)?;
        let index = ServiceIpIndex::build(&services);

        let pods = self.api.list_pods().await.map_err(ReconcileError::ListPods)?;

        let mut report = TickReport {
            services: services.len(),
            pods: pods.len(),
            collisions: collisions_in(&index, &pods),
            ..Default::default()
        };

        for collision in &report.collisions {
            warn!(
                service_namespace = %collision.service.namespace,
                service = %collision.service.name,
                pod_namespace = %collision.pod.namespace,
                pod = %collision.pod.name,
                ip = %collision.ip(),
                "{}", collision
            );

            if !self.config.delete_overlapped_pods {
                continue;
            }

            let pod = &collision.pod;
            match self.api.delete_pod(&pod.namespace, &pod.name).await {
                Ok(()) => {
                    info!("Deleted {} to release {}", pod, pod.ip);
                    report.deleted += 1;
                }
                Err(e) => {
                    error!("error deleting {}: {}", pod, error_chain(&e));
                    report.delete_failures += 1;
                }
            }
        }

        Ok(report)
    }
}
