//! Multi-type intersection queries over the entity table.
//!
//! Queries use internal iteration: the caller hands the manager a
//! closure, the manager walks the entity table in creation order and
//! invokes the closure for every entity whose mask carries all requested
//! component types. The table is locked for the duration of the walk, so
//! closures may freely call [`Manager::create_entity`] and
//! [`Manager::remove_entity`]; those mutations are deferred and do not
//! affect the traversal underway.
//!
//! `query` through `query4` borrow components shared; the `_mut`
//! variants borrow them exclusive. Requesting a component type that was
//! never registered yields no matches.

use kestrel_component::{Component, ComponentMask, Entity};

use crate::manager::Manager;

macro_rules! queries {
    ($query:ident, $query_mut:ident; $($ty:ident),+) => {
        impl Manager {
            #[allow(non_snake_case)]
            pub fn $query<$($ty: Component),+>(
                &self,
                mut f: impl FnMut(Entity, $(&$ty),+),
            ) {
                $(
                    let Some($ty) = self.slot_of::<$ty>() else { return };
                )+
                let mask = ComponentMask::EMPTY$(.with($ty.index))+;
                $(
                    let $ty = $ty.typed::<$ty>();
                    let $ty = $ty.borrow();
                )+
                let _guard = self.lock();
                let table = self.table_ref();
                for entity in table.iter() {
                    let Some(have) = table.mask(entity) else { continue };
                    if !have.contains_all(mask) {
                        continue;
                    }
                    f(
                        entity,
                        $(
                            match $ty.get(entity) {
                                Some(component) => component,
                                None => continue,
                            }
                        ),+
                    );
                }
            }

            #[allow(non_snake_case)]
            pub fn $query_mut<$($ty: Component),+>(
                &self,
                mut f: impl FnMut(Entity, $(&mut $ty),+),
            ) {
                $(
                    let Some($ty) = self.slot_of::<$ty>() else { return };
                )+
                let mask = ComponentMask::EMPTY$(.with($ty.index))+;
                $(
                    let $ty = $ty.typed::<$ty>();
                    let mut $ty = $ty.borrow_mut();
                )+
                let _guard = self.lock();
                let table = self.table_ref();
                for entity in table.iter() {
                    let Some(have) = table.mask(entity) else { continue };
                    if !have.contains_all(mask) {
                        continue;
                    }
                    f(
                        entity,
                        $(
                            match $ty.get_mut(entity) {
                                Some(component) => component,
                                None => continue,
                            }
                        ),+
                    );
                }
            }
        }
    };
}

queries!(query, query_mut; A);
queries!(query2, query2_mut; A, B);
queries!(query3, query3_mut; A, B, C);
queries!(query4, query4_mut; A, B, C, D);

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use kestrel_component::Component;

    use super::*;

    struct Position(f32, f32);

    impl Component for Position {
        fn type_name() -> &'static str {
            "Position"
        }
    }

    struct Velocity(f32, f32);

    impl Component for Velocity {
        fn type_name() -> &'static str {
            "Velocity"
        }
    }

    struct Tag;

    impl Component for Tag {
        fn type_name() -> &'static str {
            "Tag"
        }
    }

    fn spawn(manager: &Manager) -> (Entity, Entity, Entity) {
        let e1 = manager.create_entity(|e| {
            e.attach(Position(0.0, 0.0)).attach(Velocity(1.0, 0.0));
        });
        let e2 = manager.create_entity(|e| {
            e.attach(Position(5.0, 5.0));
        });
        let e3 = manager.create_entity(|e| {
            e.attach(Position(9.0, 9.0)).attach(Velocity(0.0, 2.0));
        });
        (e1, e2, e3)
    }

    #[test]
    fn test_query_matches_exactly_in_creation_order() {
        let manager = Manager::new();
        let (e1, _e2, e3) = spawn(&manager);

        let mut seen = Vec::new();
        manager.query2(|entity, _p: &Position, _v: &Velocity| seen.push(entity));
        assert_eq!(seen, vec![e1, e3]);

        let mut all = Vec::new();
        manager.query(|entity, _p: &Position| all.push(entity));
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_query_unregistered_type_yields_nothing() {
        let manager = Manager::new();
        spawn(&manager);

        let mut seen = Vec::new();
        manager.query2(|entity, _p: &Position, _t: &Tag| seen.push(entity));
        assert!(seen.is_empty());
    }

    #[test]
    fn test_query_mut_writes_through() {
        let manager = Manager::new();
        let (e1, _e2, e3) = spawn(&manager);

        manager.query2_mut(|_entity, p: &mut Position, v: &mut Velocity| {
            p.0 += v.0;
            p.1 += v.1;
        });

        let h1 = manager.get_entity(e1).unwrap();
        assert_eq!(h1.get(|p: &Position| (p.0, p.1)).unwrap(), (1.0, 0.0));
        let h3 = manager.get_entity(e3).unwrap();
        assert_eq!(h3.get(|p: &Position| (p.0, p.1)).unwrap(), (9.0, 11.0));
    }

    #[test]
    fn test_removal_during_query_is_deferred() {
        let manager = Manager::new();
        let (e1, _e2, e3) = spawn(&manager);

        let mut seen = Vec::new();
        manager.query2(|entity, _p: &Position, _v: &Velocity| {
            seen.push(entity);
            // Deferred: the traversal underway still yields e3.
            manager.remove_entity(e3).ok();
        });
        assert_eq!(seen, vec![e1, e3]);
        assert!(manager.is_alive(e3));

        manager.commit();
        assert!(!manager.is_alive(e3));

        let mut after = Vec::new();
        manager.query2(|entity, _p: &Position, _v: &Velocity| after.push(entity));
        assert_eq!(after, vec![e1]);
    }

    #[test]
    fn test_removal_of_nonmatching_entity_mid_query() {
        let manager = Manager::new();

        // The victim shares Position with the queried set but is not
        // matched by it; removing it mid-traversal crosses registries.
        let victim = manager.create_entity(|e| {
            e.attach(Position(0.0, 0.0)).attach(Velocity(1.0, 1.0));
        });
        let first = manager.create_entity(|e| {
            e.attach(Position(1.0, 0.0)).attach(Tag);
        });
        let second = manager.create_entity(|e| {
            e.attach(Position(2.0, 0.0)).attach(Tag);
        });

        let mut seen = Vec::new();
        manager.query2(|entity, _p: &Position, _t: &Tag| {
            seen.push(entity);
            manager.remove_entity(victim).ok();
        });

        // Later visits stay intact and the removal is deferred.
        assert_eq!(seen, vec![first, second]);
        assert!(manager.is_alive(victim));

        manager.commit();
        assert!(!manager.is_alive(victim));

        let mut moving = Vec::new();
        manager.query2(|entity, _p: &Position, _v: &Velocity| moving.push(entity));
        assert!(moving.is_empty());
    }

    #[test]
    fn test_creation_during_query_not_yielded() {
        let manager = Manager::new();
        spawn(&manager);

        let spawned: Rc<RefCell<Vec<Entity>>> = Rc::new(RefCell::new(Vec::new()));
        let mut visits = 0;
        manager.query(|_entity, _p: &Position| {
            visits += 1;
            if spawned.borrow().is_empty() {
                let entity = manager.create_entity(|e| {
                    e.attach(Position(0.0, 0.0));
                });
                spawned.borrow_mut().push(entity);
            }
        });
        assert_eq!(visits, 3, "deferred entity must not join this traversal");

        manager.commit();
        let mut after = 0;
        manager.query(|_entity, _p: &Position| after += 1);
        assert_eq!(after, 4);
    }

    #[test]
    fn test_query4_intersection() {
        let manager = Manager::new();

        struct A;
        struct B;
        impl Component for A {
            fn type_name() -> &'static str {
                "A"
            }
        }
        impl Component for B {
            fn type_name() -> &'static str {
                "B"
            }
        }

        let full = manager.create_entity(|e| {
            e.attach(Position(0.0, 0.0))
                .attach(Velocity(0.0, 0.0))
                .attach(A)
                .attach(B);
        });
        manager.create_entity(|e| {
            e.attach(Position(0.0, 0.0)).attach(A).attach(B);
        });

        let mut seen = Vec::new();
        manager.query4(|entity, _p: &Position, _v: &Velocity, _a: &A, _b: &B| {
            seen.push(entity);
        });
        assert_eq!(seen, vec![full]);
    }
}
