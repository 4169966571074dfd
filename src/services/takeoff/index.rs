//! Id-keyed arena over one project
//!
//! Cross references are resolved and validated once here; later stages only
//! see entities whose references resolved.

use std::collections::HashMap;

use crate::domain::{
    FinishSpec, Fixture, FloorPlanProject, Opening, Room, Structure, StructureKind, Wall,
};
use crate::error::{EntityKind, TakeoffError};

pub struct ProjectIndex<'a> {
    pub project: &'a FloorPlanProject,
    rooms: HashMap<&'a str, &'a Room>,
    walls: HashMap<&'a str, &'a Wall>,
    finishes: HashMap<&'a str, &'a FinishSpec>,
    openings_by_wall: HashMap<&'a str, Vec<&'a Opening>>,
    fixtures_by_room: HashMap<&'a str, Vec<&'a Fixture>>,
    structures_by_room: HashMap<&'a str, Vec<&'a Structure>>,
}

impl<'a> ProjectIndex<'a> {
    /// Index the project, reporting every unresolved reference
    pub fn build(project: &'a FloorPlanProject, errors: &mut Vec<TakeoffError>) -> Self {
        let rooms = first_by_id(project.rooms.iter().map(|r| (r.id.as_str(), r)), "room");
        let walls = first_by_id(project.walls.iter().map(|w| (w.id.as_str(), w)), "wall");
        let finishes = first_by_id(
            project.finish_specs.iter().map(|f| (f.id.as_str(), f)),
            "finish spec",
        );

        for room in &project.rooms {
            for wall_id in &room.boundary_wall_ids {
                if !walls.contains_key(wall_id.as_str()) {
                    errors.push(TakeoffError::dangling(
                        EntityKind::Room,
                        &room.id,
                        EntityKind::Wall,
                        wall_id,
                    ));
                }
            }

            let finish_refs = [
                &room.floor_finish_id,
                &room.wall_finish_id,
                &room.ceiling_finish_id,
            ];
            for finish_id in finish_refs.into_iter().flatten() {
                if !finishes.contains_key(finish_id.as_str()) {
                    errors.push(TakeoffError::dangling(
                        EntityKind::Room,
                        &room.id,
                        EntityKind::FinishSpec,
                        finish_id,
                    ));
                }
            }
        }

        let mut openings_by_wall: HashMap<&str, Vec<&Opening>> = HashMap::new();
        for opening in &project.openings {
            if walls.contains_key(opening.wall_id.as_str()) {
                openings_by_wall
                    .entry(opening.wall_id.as_str())
                    .or_default()
                    .push(opening);
            } else {
                errors.push(TakeoffError::dangling(
                    EntityKind::Opening,
                    &opening.id,
                    EntityKind::Wall,
                    &opening.wall_id,
                ));
            }
        }

        let mut fixtures_by_room: HashMap<&str, Vec<&Fixture>> = HashMap::new();
        for fixture in &project.fixtures {
            if rooms.contains_key(fixture.room_id.as_str()) {
                fixtures_by_room
                    .entry(fixture.room_id.as_str())
                    .or_default()
                    .push(fixture);
            } else {
                errors.push(TakeoffError::dangling(
                    EntityKind::Fixture,
                    &fixture.id,
                    EntityKind::Room,
                    &fixture.room_id,
                ));
            }
        }

        let mut structures_by_room: HashMap<&str, Vec<&Structure>> = HashMap::new();
        for structure in &project.structures {
            for room_id in &structure.affected_room_ids {
                if rooms.contains_key(room_id.as_str()) {
                    structures_by_room
                        .entry(room_id.as_str())
                        .or_default()
                        .push(structure);
                } else {
                    errors.push(TakeoffError::dangling(
                        EntityKind::Structure,
                        &structure.id,
                        EntityKind::Room,
                        room_id,
                    ));
                }
            }
        }

        tracing::debug!(
            project_id = %project.id,
            rooms = rooms.len(),
            walls = walls.len(),
            openings = project.openings.len(),
            fixtures = project.fixtures.len(),
            "Indexed floor plan"
        );

        Self {
            project,
            rooms,
            walls,
            finishes,
            openings_by_wall,
            fixtures_by_room,
            structures_by_room,
        }
    }

    pub fn room(&self, id: &str) -> Option<&'a Room> {
        self.rooms.get(id).copied()
    }

    pub fn wall(&self, id: &str) -> Option<&'a Wall> {
        self.walls.get(id).copied()
    }

    /// Indexed walls in declaration order; a repeated id yields only the
    /// wall that `wall(id)` resolves to
    pub fn walls(&self) -> impl Iterator<Item = &'a Wall> + '_ {
        self.project.walls.iter().filter(|wall| {
            self.walls
                .get(wall.id.as_str())
                .is_some_and(|kept| std::ptr::eq(*kept, *wall))
        })
    }

    pub fn finish(&self, id: Option<&str>) -> Option<&'a FinishSpec> {
        id.and_then(|id| self.finishes.get(id).copied())
    }

    pub fn openings_on(&self, wall_id: &str) -> &[&'a Opening] {
        self.openings_by_wall
            .get(wall_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn fixtures_in(&self, room_id: &str) -> &[&'a Fixture] {
        self.fixtures_by_room
            .get(room_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Columns standing inside the room
    pub fn columns_in(&self, room_id: &str) -> impl Iterator<Item = &'a Structure> + '_ {
        self.structures_by_room
            .get(room_id)
            .into_iter()
            .flatten()
            .copied()
            .filter(|s| s.kind == StructureKind::Column)
    }

    /// Resolved boundary walls in declaration order, duplicates removed
    pub fn boundary_walls(&self, room: &Room) -> Vec<&'a Wall> {
        let mut seen: Vec<&str> = Vec::with_capacity(room.boundary_wall_ids.len());
        room.boundary_wall_ids
            .iter()
            .filter_map(|id| {
                if seen.contains(&id.as_str()) {
                    return None;
                }
                seen.push(id.as_str());
                self.wall(id)
            })
            .collect()
    }
}

/// Keep the first entity for each id, warning about duplicates
fn first_by_id<'a, T>(
    entities: impl Iterator<Item = (&'a str, &'a T)>,
    kind: &str,
) -> HashMap<&'a str, &'a T> {
    let mut map = HashMap::new();
    for (id, entity) in entities {
        if map.contains_key(id) {
            tracing::warn!(id = id, kind = kind, "Duplicate entity id, keeping the first");
            continue;
        }
        map.insert(id, entity);
    }
    map
}
