use crate::spec::{BackendSpecification, ControllerActionSpec};

/// A naming convention that synthesizes extra output after the primary
/// derivation pass.
///
/// Conventions run in table order, each seeing the output of the previous
/// one. A convention only acts when [`Convention::applies`] holds.
pub trait Convention: Send + Sync {
    fn name(&self) -> &str;
    fn applies(&self, spec: &BackendSpecification) -> bool;
    fn apply(&self, spec: &mut BackendSpecification);
}

/// The conventions every compiler starts with, in evaluation order.
pub fn default_conventions() -> Vec<Box<dyn Convention>> {
    vec![
        Box::new(PasswordHashingHook),
        Box::new(CanonicalUserControllers),
    ]
}

pub const USER_SCHEMA: &str = "User";
pub const PRE_SAVE_HOOK: &str = "pre-save";
pub const USERS_ROUTE_PREFIX: &str = "/api/users";

/// Models named exactly `User` get a `pre-save` hook that hashes the password.
pub struct PasswordHashingHook;

impl Convention for PasswordHashingHook {
    fn name(&self) -> &str {
        "password-hashing-hook"
    }

    fn applies(&self, spec: &BackendSpecification) -> bool {
        spec.schemas.iter().any(|s| s.name == USER_SCHEMA)
    }

    fn apply(&self, spec: &mut BackendSpecification) {
        for schema in spec.schemas.iter_mut().filter(|s| s.name == USER_SCHEMA) {
            schema.hooks.insert(
                PRE_SAVE_HOOK.to_string(),
                "Hash the password using bcrypt before saving the user.".to_string(),
            );
        }
    }
}

/// Any route under `/api/users` guarantees the create / list / fetch-by-id
/// user controllers. Controllers that already exist by name are left alone.
pub struct CanonicalUserControllers;

const CANONICAL_USER_CONTROLLERS: [(&str, &str); 3] = [
    (
        "createUserController",
        "Create a new User from req.body. If the email or username already exists, respond with a status code of 409 and a JSON message: { 'message': 'User already exists.' }. On successful creation, respond with a status of 201 and the new user object, but exclude the password field from the response.",
    ),
    (
        "getAllUsersController",
        "Retrieve all users from the database. Exclude the password field from the response for all users.",
    ),
    (
        "getUserByIdController",
        "Retrieve a single user by their ID from req.params.id. If not found, return a 404 error. Exclude the password field from the response.",
    ),
];

impl Convention for CanonicalUserControllers {
    fn name(&self) -> &str {
        "canonical-user-controllers"
    }

    fn applies(&self, spec: &BackendSpecification) -> bool {
        spec.routes.iter().any(|r| r.path.starts_with(USERS_ROUTE_PREFIX))
    }

    fn apply(&self, spec: &mut BackendSpecification) {
        for (name, logic) in CANONICAL_USER_CONTROLLERS {
            if spec.controller(name).is_none() {
                spec.controllers.push(ControllerActionSpec {
                    name: name.to_string(),
                    schema: USER_SCHEMA.to_string(),
                    logic: logic.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{HttpMethod, RouteSpec, SchemaSpec};
    use indexmap::IndexMap;

    fn empty_spec() -> BackendSpecification {
        BackendSpecification {
            project_name: "generated-api".to_string(),
            schemas: vec![],
            controllers: vec![],
            routes: vec![],
        }
    }

    fn users_route() -> RouteSpec {
        RouteSpec {
            path: "/api/users/:id".to_string(),
            method: HttpMethod::Get,
            schema: "User".to_string(),
            controller: "getUserByIdController".to_string(),
            description: "GET /api/users/:id".to_string(),
        }
    }

    #[test]
    fn test_hook_only_for_exact_user_name() {
        let mut spec = empty_spec();
        spec.schemas.push(SchemaSpec::new("User", IndexMap::new()));
        spec.schemas.push(SchemaSpec::new("user", IndexMap::new()));

        let convention = PasswordHashingHook;
        assert!(convention.applies(&spec));
        convention.apply(&mut spec);

        assert!(spec.schemas[0].hooks.contains_key(PRE_SAVE_HOOK));
        assert!(spec.schemas[1].hooks.is_empty());
    }

    #[test]
    fn test_canonical_controllers_are_not_duplicated() {
        let mut spec = empty_spec();
        spec.routes.push(users_route());
        spec.controllers.push(ControllerActionSpec {
            name: "getAllUsersController".to_string(),
            schema: "Account".to_string(),
            logic: "custom".to_string(),
        });

        let convention = CanonicalUserControllers;
        assert!(convention.applies(&spec));
        convention.apply(&mut spec);
        convention.apply(&mut spec);

        let names: Vec<_> = spec.controllers.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["getAllUsersController", "createUserController", "getUserByIdController"]
        );
        assert_eq!(spec.controllers[0].logic, "custom");
    }

    #[test]
    fn test_canonical_controllers_need_users_route() {
        let mut spec = empty_spec();
        let mut route = users_route();
        route.path = "/api/user".to_string();
        spec.routes.push(route);
        assert!(!CanonicalUserControllers.applies(&spec));
    }
}
