use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employee")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub department: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Compensation,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Compensation => Entity::has_one(super::compensation::Entity).into(),
        }
    }
}

impl Related<super::compensation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Compensation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
