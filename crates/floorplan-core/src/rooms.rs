//! Room detection over the wall graph.
//!
//! Walls are edges and their endpoint cells are vertices. A room is a cycle
//! of walls; rooms are created and destroyed incrementally, only around the
//! wall that just changed. Walls that cross mid-segment are not connected.

use crate::objects::{Entity, Room, RoomId, Wall, WallId};
use crate::viewport::Cell;
use crate::world::World;
use std::collections::{BTreeSet, HashMap, HashSet};

/// A closed loop of walls found by [`find_cycle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    /// Walls on the loop, starting with the wall the search began from.
    pub walls: Vec<WallId>,
    /// Loop vertices in traversal order, one per wall.
    pub vertices: Vec<Cell>,
}

/// Adjacency index over the walls a search may enter, keyed by endpoint.
type Adjacency<'a> = HashMap<Cell, Vec<&'a Wall>>;

/// Find a path from endpoint A of `start` back to its endpoint B that only
/// uses walls accepted by `allowed`.
///
/// The search is depth-first and never visits a vertex twice, so the result
/// is a simple cycle of at least three walls. At each vertex a wall that
/// closes the loop directly is preferred over exploring further.
pub fn find_cycle(world: &World, start: WallId, allowed: impl Fn(&Wall) -> bool) -> Option<Cycle> {
    let start_wall = world.wall(start).ok()?;
    if start_wall.is_degenerate() {
        return None;
    }
    let origin = start_wall.a.cell();
    let target = start_wall.b.cell();

    let mut adjacency: Adjacency<'_> = HashMap::new();
    for wall in world.walls() {
        if wall.id() == start || wall.is_degenerate() || !allowed(wall) {
            continue;
        }
        adjacency.entry(wall.a.cell()).or_default().push(wall);
        adjacency.entry(wall.b.cell()).or_default().push(wall);
    }

    let mut visited = HashSet::from([origin]);
    let mut cycle = Cycle {
        walls: vec![start],
        vertices: vec![origin],
    };
    if search(&adjacency, origin, target, &mut visited, &mut cycle) {
        Some(cycle)
    } else {
        None
    }
}

fn search(
    adjacency: &Adjacency<'_>,
    current: Cell,
    target: Cell,
    visited: &mut HashSet<Cell>,
    path: &mut Cycle,
) -> bool {
    let Some(walls) = adjacency.get(&current) else {
        return false;
    };

    // Fewer than three walls enclose no area.
    if path.walls.len() >= 2 {
        if let Some(closing) = walls.iter().find(|wall| wall.far_end(current) == Some(target)) {
            path.walls.push(closing.id());
            path.vertices.push(target);
            return true;
        }
    }

    for wall in walls {
        let Some(next) = wall.far_end(current) else {
            continue;
        };
        if next == target || !visited.insert(next) {
            continue;
        }

        path.walls.push(wall.id());
        path.vertices.push(next);
        if search(adjacency, next, target, visited, path) {
            return true;
        }
        path.walls.pop();
        path.vertices.pop();
    }

    false
}

/// Remove a room from the world and from every wall that bordered it.
pub fn destroy_room(world: &mut World, room: RoomId) {
    for wall in world.walls_mut() {
        wall.leave_room(room);
    }
    if world.remove(room.into()).is_some() {
        log::info!("Destroyed {room}");
    }
}

/// A wall is about to leave the world: every room it bordered goes with it.
pub fn wall_destroyed(world: &mut World, wall: WallId) {
    let Ok(removed) = world.wall(wall) else {
        return;
    };
    let rooms: Vec<RoomId> = removed.rooms().collect();
    for room in rooms {
        destroy_room(world, room);
    }
}

/// A wall was added or moved: re-verify its rooms and look for a new one.
///
/// Each room the wall borders survives only if a loop back to the wall still
/// exists through walls of that same room. A new room is then searched for
/// through walls that belong to none of the surviving rooms. Returns the id
/// of the room created, if any.
pub fn wall_changed(world: &mut World, wall: WallId) -> Option<RoomId> {
    let memberships: Vec<RoomId> = world.wall(wall).ok()?.rooms().collect();

    let mut retained = BTreeSet::new();
    for room in memberships {
        match find_cycle(world, wall, |other| other.borders(room)) {
            Some(cycle) => {
                if let Ok(entity) = world.room_mut(room) {
                    entity.set_outline(cycle.vertices);
                }
                retained.insert(room);
            }
            None => {
                log::debug!("{room} no longer closes around {wall}");
                destroy_room(world, room);
            }
        }
    }

    let cycle = find_cycle(world, wall, |other| !other.borders_any(&retained))?;
    let room = world.allocate_room_id();
    for id in &cycle.walls {
        if let Ok(member) = world.wall_mut(*id) {
            member.join_room(room);
        }
    }
    log::info!("Created {room} enclosed by {} walls", cycle.walls.len());
    world.insert(Entity::Room(Room::new(room, cycle.vertices)));
    Some(room)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_wall(world: &mut World, a: (i32, i32), b: (i32, i32)) -> WallId {
        let id = world.allocate_wall_id();
        world.insert(Entity::Wall(Wall::new(id, Cell::new(a.0, a.1), Cell::new(b.0, b.1))));
        wall_changed(world, id);
        id
    }

    fn square(world: &mut World) -> [WallId; 4] {
        [
            add_wall(world, (0, 0), (4, 0)),
            add_wall(world, (4, 0), (4, 4)),
            add_wall(world, (4, 4), (0, 4)),
            add_wall(world, (0, 4), (0, 0)),
        ]
    }

    fn rooms_of(world: &World, wall: WallId) -> Vec<RoomId> {
        world.wall(wall).unwrap().rooms().collect()
    }

    #[test]
    fn test_open_chain_has_no_room() {
        let mut world = World::new();
        add_wall(&mut world, (0, 0), (4, 0));
        add_wall(&mut world, (4, 0), (4, 4));
        add_wall(&mut world, (4, 4), (0, 4));
        assert_eq!(world.room_count(), 0);
    }

    #[test]
    fn test_square_creates_one_room() {
        let mut world = World::new();
        let walls = square(&mut world);

        assert_eq!(world.room_count(), 1);
        assert_eq!(world.len(), 5);
        let room = world.rooms().next().unwrap().id();
        for wall in walls {
            assert_eq!(rooms_of(&world, wall), vec![room]);
        }
    }

    #[test]
    fn test_room_outline_follows_cycle() {
        let mut world = World::new();
        square(&mut world);
        let room = world.rooms().next().unwrap();
        let mut outline = room.outline().to_vec();
        outline.sort_by_key(|cell| (cell.col, cell.row));
        assert_eq!(
            outline,
            vec![Cell::new(0, 0), Cell::new(0, 4), Cell::new(4, 0), Cell::new(4, 4)]
        );
    }

    #[test]
    fn test_pentagon() {
        let mut world = World::new();
        let walls = [
            add_wall(&mut world, (0, 0), (4, 0)),
            add_wall(&mut world, (4, 0), (6, 3)),
            add_wall(&mut world, (6, 3), (2, 6)),
            add_wall(&mut world, (2, 6), (-2, 3)),
        ];
        assert_eq!(world.room_count(), 0);
        let closing = add_wall(&mut world, (-2, 3), (0, 0));

        assert_eq!(world.room_count(), 1);
        let room = world.rooms().next().unwrap().id();
        for wall in walls.into_iter().chain([closing]) {
            assert!(world.wall(wall).unwrap().borders(room));
        }
    }

    #[test]
    fn test_reversed_endpoints_still_close() {
        let mut world = World::new();
        add_wall(&mut world, (0, 0), (4, 0));
        add_wall(&mut world, (4, 4), (4, 0));
        add_wall(&mut world, (0, 4), (4, 4));
        add_wall(&mut world, (0, 0), (0, 4));
        assert_eq!(world.room_count(), 1);
    }

    #[test]
    fn test_removing_any_wall_destroys_room() {
        for victim in 0..4 {
            let mut world = World::new();
            let walls = square(&mut world);
            world.remove_wall(walls[victim]).unwrap();

            assert_eq!(world.room_count(), 0);
            assert_eq!(world.wall_count(), 3);
            for wall in world.walls() {
                assert_eq!(wall.rooms().count(), 0);
            }
        }
    }

    #[test]
    fn test_adjacent_squares_share_wall() {
        let mut world = World::new();
        let left = square(&mut world);
        add_wall(&mut world, (4, 0), (8, 0));
        add_wall(&mut world, (8, 0), (8, 4));
        let closing = add_wall(&mut world, (8, 4), (4, 4));

        assert_eq!(world.room_count(), 2);
        let shared = left[1];
        assert_eq!(rooms_of(&world, shared).len(), 2);
        assert_eq!(rooms_of(&world, closing).len(), 1);
        assert_eq!(rooms_of(&world, left[3]).len(), 1);

        world.remove_wall(shared).unwrap();
        assert_eq!(world.room_count(), 0);
        assert!(world.walls().all(|wall| wall.rooms().count() == 0));
    }

    #[test]
    fn test_moved_wall_rechecks_rooms() {
        let mut world = World::new();
        let walls = square(&mut world);
        let first_room = world.rooms().next().unwrap().id();

        world.wall_mut(walls[1]).unwrap().b.row = 6;
        assert_eq!(wall_changed(&mut world, walls[1]), None);
        assert_eq!(world.room_count(), 0);
        assert!(!world.contains(first_room));

        world.wall_mut(walls[1]).unwrap().b.row = 4;
        let recreated = wall_changed(&mut world, walls[1]).unwrap();
        assert_ne!(recreated, first_room);
        assert_eq!(world.room_count(), 1);
        for wall in walls {
            assert_eq!(rooms_of(&world, wall), vec![recreated]);
        }
    }

    #[test]
    fn test_shared_wall_recheck_keeps_both_rooms() {
        let mut world = World::new();
        let left = square(&mut world);
        add_wall(&mut world, (4, 0), (8, 0));
        add_wall(&mut world, (8, 0), (8, 4));
        add_wall(&mut world, (8, 4), (4, 4));
        let shared = left[1];
        let before = rooms_of(&world, shared);
        assert_eq!(before.len(), 2);

        for room in &before {
            world.room_mut(*room).unwrap().set_outline(Vec::new());
        }
        assert_eq!(wall_changed(&mut world, shared), None);
        assert_eq!(world.room_count(), 2);
        assert_eq!(rooms_of(&world, shared), before);
        for room in before {
            assert_eq!(world.room(room).unwrap().outline().len(), 4);
        }
    }

    #[test]
    fn test_unchanged_room_is_retained() {
        let mut world = World::new();
        let walls = square(&mut world);
        let room = world.rooms().next().unwrap().id();

        for wall in walls {
            assert_eq!(wall_changed(&mut world, wall), None);
        }
        assert_eq!(world.room_count(), 1);
        assert!(world.contains(room));
    }

    #[test]
    fn test_crossing_walls_do_not_connect() {
        let mut world = World::new();
        add_wall(&mut world, (0, 2), (4, 2));
        add_wall(&mut world, (2, 0), (2, 4));
        add_wall(&mut world, (4, 2), (4, 0));
        add_wall(&mut world, (4, 0), (2, 0));
        assert_eq!(world.room_count(), 0);
    }

    #[test]
    fn test_coincident_walls_are_not_a_room() {
        let mut world = World::new();
        add_wall(&mut world, (0, 0), (4, 0));
        add_wall(&mut world, (4, 0), (0, 0));
        assert_eq!(world.room_count(), 0);
        assert_eq!(world.wall_count(), 2);
    }

    #[test]
    fn test_find_cycle_respects_filter() {
        let mut world = World::new();
        let walls = square(&mut world);
        assert!(find_cycle(&world, walls[0], |_| true).is_some());
        assert!(find_cycle(&world, walls[0], |wall| wall.id() != walls[2]).is_none());
    }
}
