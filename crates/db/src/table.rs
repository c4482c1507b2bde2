use sea_query::Iden;

#[derive(Iden, Clone, Copy)]
pub enum User {
    Table,
    Id,
    Username,
    Email,
    FirstName,
    LastName,
    Password,
    CreatedAt,
    LastLogin,
}

#[derive(Iden, Clone, Copy)]
pub enum UserProfile {
    Table,
    UserId,
    Phone,
    Address,
    ProfilePicture,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum Project {
    Table,
    Id,
    Name,
    Description,
    ManagerId,
    Deadline,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum ProjectMember {
    Table,
    ProjectId,
    UserId,
}

#[derive(Iden, Clone, Copy)]
pub enum Task {
    Table,
    Id,
    Title,
    Description,
    Priority,
    Status,
    AssignedTo,
    CreatedBy,
    DueDate,
    CreatedAt,
    UpdatedAt,
}

/// Names for self-joined user tables and the columns read through them.
#[derive(Iden, Clone, Copy)]
pub enum JoinAlias {
    Assignee,
    Creator,
    Manager,
    AssignedToUsername,
    CreatedByUsername,
    ManagerUsername,
}
