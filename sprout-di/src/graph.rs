//! Dependency graph derived from registered [ComponentDescriptor]s. The graph validates that all
//! dependencies are known and computes the construction order, detecting cycles along the way.
//!
//! Ordering is a depth-first post-order using three-color marking: a node is first unvisited,
//! then in progress while its dependencies are being visited, and finally done once it has been
//! appended to the order. Reaching an in-progress node means the current path loops back on
//! itself, and that path is reported in full.
//!
//! Both roots and the dependencies of each node are visited in registration order, so components
//! with no path between them keep their relative registration order wherever the traversal
//! allows it. The declared order of dependencies is kept separately for
//! [dependencies_of](DependencyGraph::dependencies_of).

use crate::component::{ComponentDescriptor, ComponentId};
use crate::error::ContainerError;
use fxhash::FxHashMap;
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// A closed dependency path, where the first component is repeated at the end, e.g.
/// `A -> B -> A`.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DependencyCycle(Vec<ComponentId>);

impl DependencyCycle {
    #[inline]
    pub fn path(&self) -> &[ComponentId] {
        &self.0
    }

    /// Checks if given component takes part in the cycle.
    pub fn contains(&self, id: &ComponentId) -> bool {
        self.0.contains(id)
    }
}

impl Display for DependencyCycle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(" -> "))
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

struct Frame {
    node: usize,
    next_edge: usize,
}

/// Adjacency view over component identities.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<ComponentId>,
    edges: Vec<Vec<usize>>,
    visit_order: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Builds the graph from given descriptors, preserving their order. Fails if a dependency is
    /// not among the descriptors.
    pub fn build<'a, I>(descriptors: I) -> Result<Self, ContainerError>
    where
        I: IntoIterator<Item = &'a ComponentDescriptor>,
    {
        let descriptors = descriptors.into_iter().collect_vec();

        let mut indices = FxHashMap::default();
        for (index, descriptor) in descriptors.iter().enumerate() {
            if indices.insert(descriptor.id(), index).is_some() {
                return Err(ContainerError::DuplicateIdentity(descriptor.id().clone()));
            }
        }

        let edges: Vec<Vec<usize>> = descriptors
            .iter()
            .map(|descriptor| {
                descriptor
                    .dependencies()
                    .iter()
                    .map(|dependency| {
                        indices.get(dependency).copied().ok_or_else(|| {
                            ContainerError::UnknownDependency {
                                component: descriptor.id().clone(),
                                missing: dependency.clone(),
                            }
                        })
                    })
                    .try_collect()
            })
            .try_collect()?;

        // node indices are registration indices
        let visit_order = edges
            .iter()
            .map(|dependencies| dependencies.iter().copied().sorted().dedup().collect_vec())
            .collect();

        Ok(Self {
            nodes: descriptors
                .iter()
                .map(|descriptor| descriptor.id().clone())
                .collect(),
            edges,
            visit_order,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct dependencies of given component, in declared order.
    pub fn dependencies_of(&self, id: &ComponentId) -> Option<Vec<&ComponentId>> {
        self.nodes.iter().position(|node| node == id).map(|index| {
            self.edges[index]
                .iter()
                .map(|dependency| &self.nodes[*dependency])
                .collect()
        })
    }

    /// Returns all identities ordered so that each one comes after all of its dependencies.
    pub fn topological_order(&self) -> Result<Vec<ComponentId>, ContainerError> {
        let mut marks = vec![Mark::Unvisited; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut path: Vec<Frame> = Vec::new();

        for root in 0..self.nodes.len() {
            if marks[root] != Mark::Unvisited {
                continue;
            }

            marks[root] = Mark::InProgress;
            path.push(Frame {
                node: root,
                next_edge: 0,
            });

            while let Some(frame) = path.last_mut() {
                let node = frame.node;
                let next_edge = frame.next_edge;
                frame.next_edge += 1;

                match self.visit_order[node].get(next_edge).copied() {
                    Some(dependency) => match marks[dependency] {
                        Mark::Unvisited => {
                            marks[dependency] = Mark::InProgress;
                            path.push(Frame {
                                node: dependency,
                                next_edge: 0,
                            });
                        }
                        Mark::InProgress => {
                            return Err(ContainerError::CyclicDependency(
                                self.cycle(&path, dependency),
                            ));
                        }
                        Mark::Done => {}
                    },
                    None => {
                        marks[node] = Mark::Done;
                        order.push(self.nodes[node].clone());
                        path.pop();
                    }
                }
            }
        }

        Ok(order)
    }

    fn cycle(&self, path: &[Frame], start: usize) -> DependencyCycle {
        let cycle = path
            .iter()
            .skip_while(|frame| frame.node != start)
            .map(|frame| self.nodes[frame.node].clone())
            .chain(std::iter::once(self.nodes[start].clone()))
            .collect();

        DependencyCycle(cycle)
    }
}

#[cfg(test)]
mod tests {
    use crate::component::{ComponentDescriptor, ComponentId};
    use crate::error::ContainerError;
    use crate::graph::DependencyGraph;

    struct A;
    struct B;
    struct C;
    struct D;
    struct E;

    fn descriptor<T: Send + Sync + 'static>(dependencies: Vec<ComponentId>) -> ComponentDescriptor {
        ComponentDescriptor::from_parts(
            ComponentId::of::<T>(),
            dependencies,
            Box::new(|_| unreachable!("graph tests never construct components")),
        )
    }

    fn position(order: &[ComponentId], id: &ComponentId) -> usize {
        order.iter().position(|entry| entry == id).unwrap()
    }

    #[test]
    fn should_order_dependencies_first() {
        let descriptors = vec![
            descriptor::<A>(vec![ComponentId::of::<B>(), ComponentId::of::<C>()]),
            descriptor::<B>(vec![ComponentId::of::<D>()]),
            descriptor::<C>(vec![ComponentId::of::<D>()]),
            descriptor::<D>(vec![]),
            descriptor::<E>(vec![ComponentId::of::<A>()]),
        ];

        let graph = DependencyGraph::build(&descriptors).unwrap();
        let order = graph.topological_order().unwrap();

        assert_eq!(order.len(), descriptors.len());
        for descriptor in &descriptors {
            for dependency in descriptor.dependencies() {
                assert!(position(&order, dependency) < position(&order, descriptor.id()));
            }
        }
    }

    #[test]
    fn should_break_ties_by_registration_order() {
        let descriptors = vec![
            descriptor::<C>(vec![]),
            descriptor::<A>(vec![]),
            descriptor::<B>(vec![]),
        ];

        let order = DependencyGraph::build(&descriptors)
            .unwrap()
            .topological_order()
            .unwrap();

        assert_eq!(
            order,
            vec![
                ComponentId::of::<C>(),
                ComponentId::of::<A>(),
                ComponentId::of::<B>()
            ]
        );
    }

    #[test]
    fn should_visit_dependencies_in_registration_order() {
        let descriptors = vec![
            descriptor::<A>(vec![ComponentId::of::<C>(), ComponentId::of::<B>()]),
            descriptor::<B>(vec![]),
            descriptor::<C>(vec![]),
        ];

        let graph = DependencyGraph::build(&descriptors).unwrap();
        let order = graph.topological_order().unwrap();

        assert_eq!(
            order,
            vec![
                ComponentId::of::<B>(),
                ComponentId::of::<C>(),
                ComponentId::of::<A>()
            ]
        );
        assert_eq!(
            graph.dependencies_of(&ComponentId::of::<A>()).unwrap(),
            vec![&ComponentId::of::<C>(), &ComponentId::of::<B>()]
        );
    }

    #[test]
    fn should_visit_repeated_dependency_once() {
        let descriptors = vec![
            descriptor::<A>(vec![ComponentId::of::<B>(), ComponentId::of::<B>()]),
            descriptor::<B>(vec![]),
        ];

        let order = DependencyGraph::build(&descriptors)
            .unwrap()
            .topological_order()
            .unwrap();

        assert_eq!(order, vec![ComponentId::of::<B>(), ComponentId::of::<A>()]);
    }

    #[test]
    fn should_detect_unknown_dependency() {
        let descriptors = vec![descriptor::<A>(vec![ComponentId::of::<B>()])];

        assert!(matches!(
            DependencyGraph::build(&descriptors).unwrap_err(),
            ContainerError::UnknownDependency { component, missing }
                if component == ComponentId::of::<A>() && missing == ComponentId::of::<B>()
        ));
    }

    #[test]
    fn should_treat_qualified_dependency_as_distinct() {
        let descriptors = vec![
            descriptor::<A>(vec![ComponentId::named::<B>("other")]),
            descriptor::<B>(vec![]),
        ];

        assert!(matches!(
            DependencyGraph::build(&descriptors).unwrap_err(),
            ContainerError::UnknownDependency { missing, .. }
                if missing == ComponentId::named::<B>("other")
        ));
    }

    #[test]
    fn should_reject_duplicate_nodes() {
        let descriptors = vec![descriptor::<A>(vec![]), descriptor::<A>(vec![])];

        assert!(matches!(
            DependencyGraph::build(&descriptors).unwrap_err(),
            ContainerError::DuplicateIdentity(_)
        ));
    }

    #[test]
    fn should_report_full_cycle_path() {
        let descriptors = vec![
            descriptor::<E>(vec![]),
            descriptor::<A>(vec![ComponentId::of::<B>()]),
            descriptor::<B>(vec![ComponentId::of::<C>()]),
            descriptor::<C>(vec![ComponentId::of::<E>(), ComponentId::of::<A>()]),
        ];

        let error = DependencyGraph::build(&descriptors)
            .unwrap()
            .topological_order()
            .unwrap_err();

        match error {
            ContainerError::CyclicDependency(cycle) => {
                assert_eq!(
                    cycle.path(),
                    &[
                        ComponentId::of::<A>(),
                        ComponentId::of::<B>(),
                        ComponentId::of::<C>(),
                        ComponentId::of::<A>(),
                    ]
                );
                assert!(!cycle.contains(&ComponentId::of::<E>()));
                assert!(cycle.to_string().contains(" -> "));
            }
            error => panic!("unexpected error: {error}"),
        }
    }

    #[test]
    fn should_exclude_acyclic_prefix_from_cycle() {
        let descriptors = vec![
            descriptor::<D>(vec![ComponentId::of::<A>()]),
            descriptor::<A>(vec![ComponentId::of::<B>()]),
            descriptor::<B>(vec![ComponentId::of::<A>()]),
        ];

        let error = DependencyGraph::build(&descriptors)
            .unwrap()
            .topological_order()
            .unwrap_err();

        assert!(matches!(
            error,
            ContainerError::CyclicDependency(cycle)
                if cycle.path() == [
                    ComponentId::of::<A>(),
                    ComponentId::of::<B>(),
                    ComponentId::of::<A>(),
                ]
        ));
    }

    #[test]
    fn should_detect_self_dependency() {
        let descriptors = vec![descriptor::<A>(vec![ComponentId::of::<A>()])];

        let error = DependencyGraph::build(&descriptors)
            .unwrap()
            .topological_order()
            .unwrap_err();

        assert!(matches!(
            error,
            ContainerError::CyclicDependency(cycle)
                if cycle.path() == [ComponentId::of::<A>(), ComponentId::of::<A>()]
        ));
    }

    #[test]
    fn should_handle_deep_chains() {
        let mut descriptors = Vec::new();
        let ids = (0..10_000)
            .map(|index| ComponentId::named::<A>(index.to_string()))
            .collect::<Vec<_>>();

        for (index, id) in ids.iter().enumerate() {
            let dependencies = ids.get(index + 1).cloned().into_iter().collect();
            descriptors.push(ComponentDescriptor::from_parts(
                id.clone(),
                dependencies,
                Box::new(|_| unreachable!("graph tests never construct components")),
            ));
        }

        let order = DependencyGraph::build(&descriptors)
            .unwrap()
            .topological_order()
            .unwrap();

        assert_eq!(order.first(), ids.last());
        assert_eq!(order.last(), ids.first());
    }

    #[test]
    fn should_list_direct_dependencies() {
        let descriptors = vec![
            descriptor::<A>(vec![ComponentId::of::<B>()]),
            descriptor::<B>(vec![]),
        ];

        let graph = DependencyGraph::build(&descriptors).unwrap();
        assert_eq!(
            graph.dependencies_of(&ComponentId::of::<A>()).unwrap(),
            vec![&ComponentId::of::<B>()]
        );
        assert!(graph
            .dependencies_of(&ComponentId::of::<C>())
            .is_none());
        assert_eq!(graph.len(), 2);
    }
}
