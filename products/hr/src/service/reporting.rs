use std::collections::{HashMap, HashSet};

use entity::employee;
use platform_db::DbPool;
use sea_orm::{ConnectionTrait, DbErr};
use tracing::{debug, instrument};

use crate::error::HrResult;
use crate::model::{Employee, ReportingStructure};
use crate::store::EmployeeStore;

#[derive(Clone, Debug)]
pub struct ReportingStructureService {
    db: DbPool,
}

impl ReportingStructureService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Employee with its whole report subtree and the number of distinct
    /// employees beneath it. `None` when the employee does not exist.
    #[instrument(name = "hr.reporting.get", skip(self))]
    pub async fn get_by_id(&self, id: &str) -> HrResult<Option<ReportingStructure>> {
        let Some(root) = EmployeeStore::find_record(&self.db, id).await? else {
            return Ok(None);
        };
        let graph = ReportGraph::load(&self.db, root).await?;
        let number_of_reports = graph.order.len() - 1;
        debug!(number_of_reports, "reporting structure loaded");
        Ok(Some(ReportingStructure {
            employee: graph.into_tree(),
            number_of_reports,
        }))
    }
}

/// Subgraph reachable from one employee, loaded a level at a time.
struct ReportGraph {
    records: HashMap<String, employee::Model>,
    edges: HashMap<String, Vec<String>>,
    /// Manager through which each employee was first reached.
    discovered_by: HashMap<String, String>,
    /// Breadth-first discovery order, root first.
    order: Vec<String>,
}

impl ReportGraph {
    async fn load<C>(db: &C, root: employee::Model) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let root_id = root.id.clone();
        let mut visited = HashSet::from([root_id.clone()]);
        let mut graph = Self {
            records: HashMap::from([(root_id.clone(), root)]),
            edges: HashMap::new(),
            discovered_by: HashMap::new(),
            order: vec![root_id.clone()],
        };

        let mut frontier = vec![root_id];
        while !frontier.is_empty() {
            let mut level_edges = EmployeeStore::report_ids(db, &frontier).await?;
            let mut next = Vec::new();
            for manager in &frontier {
                let Some(reports) = level_edges.remove(manager) else {
                    continue;
                };
                for report in &reports {
                    if visited.insert(report.clone()) {
                        graph.discovered_by.insert(report.clone(), manager.clone());
                        next.push(report.clone());
                    }
                }
                graph.edges.insert(manager.clone(), reports);
            }
            for record in EmployeeStore::find_records(db, &next).await? {
                graph.records.insert(record.id.clone(), record);
            }
            graph.order.extend(next.iter().cloned());
            frontier = next;
        }
        Ok(graph)
    }

    /// Nests each employee under the manager that discovered it. Other edges
    /// to an already placed employee (cycles, second managers) render the
    /// plain record with its reports unloaded.
    fn into_tree(mut self) -> Employee {
        let mut built: HashMap<String, Employee> = HashMap::new();
        for id in self.order.iter().rev() {
            let Some(record) = self.records.get(id).cloned() else {
                continue;
            };
            let reports = self
                .edges
                .remove(id)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|report| {
                    if self.discovered_by.get(&report) == Some(id) {
                        built.remove(&report)
                    } else {
                        self.records.get(&report).cloned().map(Employee::from)
                    }
                })
                .collect();
            built.insert(id.clone(), Employee::with_reports(record, reports));
        }
        let root = &self.order[0];
        built
            .remove(root)
            .unwrap_or_else(|| Employee::from(self.records[root].clone()))
    }
}
