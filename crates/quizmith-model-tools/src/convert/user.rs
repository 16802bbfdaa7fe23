use quizmith_entity::user::{Model as UserModel, Role as RoleModel};
use quizmith_model::user::{Role, User};

use crate::convert::{FromDbModel, FromModel};

impl FromDbModel<RoleModel> for Role {
    fn from_db_model(model: RoleModel) -> Self {
        match model {
            RoleModel::User => Role::User,
            RoleModel::Admin => Role::Admin,
        }
    }
}

impl FromModel<Role> for RoleModel {
    fn from_model(model: Role) -> Self {
        match model {
            Role::User => RoleModel::User,
            Role::Admin => RoleModel::Admin,
        }
    }
}

// The password hash never leaves the db layer.
impl FromDbModel<UserModel> for User {
    fn from_db_model(model: UserModel) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            role: Role::from_db_model(model.role),
            created_at: model.created_at,
        }
    }
}
