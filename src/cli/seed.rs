use nikjin_project::ProjectInput;
use nikjin_task::{Priority, Status, TaskInput};
use nikjin_user::CreateUserInput;

const DAY: i64 = 24 * 60 * 60;
pub const SAMPLE_PASSWORD: &str = "password123";

const USERS: [(&str, &str, &str, &str); 5] = [
    ("john_doe", "john@example.com", "John", "Doe"),
    ("jane_smith", "jane@example.com", "Jane", "Smith"),
    ("mike_wilson", "mike@example.com", "Mike", "Wilson"),
    ("sarah_jones", "sarah@example.com", "Sarah", "Jones"),
    ("david_brown", "david@example.com", "David", "Brown"),
];

struct SampleProject {
    name: &'static str,
    description: &'static str,
    manager: usize,
    members: [usize; 3],
    deadline_in_days: i64,
}

const PROJECTS: [SampleProject; 3] = [
    SampleProject {
        name: "E-commerce Website",
        description: "Building a modern e-commerce platform with Django and React",
        manager: 0,
        members: [0, 1, 2],
        deadline_in_days: 60,
    },
    SampleProject {
        name: "Mobile App Development",
        description: "Creating a cross-platform mobile application using React Native",
        manager: 1,
        members: [1, 3, 4],
        deadline_in_days: 45,
    },
    SampleProject {
        name: "Data Analytics Dashboard",
        description: "Developing a comprehensive analytics dashboard for business intelligence",
        manager: 2,
        members: [2, 0, 4],
        deadline_in_days: 30,
    },
];

struct SampleTask {
    title: &'static str,
    description: &'static str,
    priority: Priority,
    status: Status,
    assigned_to: usize,
    created_by: usize,
    due_in_days: i64,
}

const TASKS: [SampleTask; 10] = [
    SampleTask {
        title: "Setup Django Backend",
        description: "Initialize Django project with proper structure and basic models",
        priority: Priority::High,
        status: Status::Completed,
        assigned_to: 0,
        created_by: 1,
        due_in_days: 7,
    },
    SampleTask {
        title: "Design User Interface",
        description: "Create wireframes and mockups for the main user interface",
        priority: Priority::High,
        status: Status::InProgress,
        assigned_to: 1,
        created_by: 0,
        due_in_days: 10,
    },
    SampleTask {
        title: "Implement Authentication",
        description: "Add user registration, login, and password reset functionality",
        priority: Priority::High,
        status: Status::Pending,
        assigned_to: 2,
        created_by: 0,
        due_in_days: 14,
    },
    SampleTask {
        title: "Database Optimization",
        description: "Optimize database queries and add proper indexing",
        priority: Priority::Medium,
        status: Status::Pending,
        assigned_to: 3,
        created_by: 2,
        due_in_days: 21,
    },
    SampleTask {
        title: "API Documentation",
        description: "Create comprehensive API documentation using Swagger",
        priority: Priority::Medium,
        status: Status::Pending,
        assigned_to: 4,
        created_by: 1,
        due_in_days: 28,
    },
    SampleTask {
        title: "Unit Testing",
        description: "Write comprehensive unit tests for all major components",
        priority: Priority::High,
        status: Status::InProgress,
        assigned_to: 0,
        created_by: 2,
        due_in_days: 35,
    },
    SampleTask {
        title: "Performance Testing",
        description: "Conduct load testing and performance optimization",
        priority: Priority::Medium,
        status: Status::Pending,
        assigned_to: 1,
        created_by: 3,
        due_in_days: 42,
    },
    SampleTask {
        title: "Security Audit",
        description: "Perform security audit and implement necessary fixes",
        priority: Priority::High,
        status: Status::Pending,
        assigned_to: 2,
        created_by: 4,
        due_in_days: 49,
    },
    SampleTask {
        title: "Deployment Setup",
        description: "Configure production deployment with CI/CD pipeline",
        priority: Priority::Medium,
        status: Status::Pending,
        assigned_to: 3,
        created_by: 0,
        due_in_days: 56,
    },
    SampleTask {
        title: "User Training",
        description: "Create user manuals and conduct training sessions",
        priority: Priority::Low,
        status: Status::Pending,
        assigned_to: 4,
        created_by: 1,
        due_in_days: 63,
    },
];

#[derive(Debug, Default, PartialEq)]
pub struct SeedSummary {
    pub users: u64,
    pub projects: u64,
    pub tasks: u64,
}

/// Inserts the demo users, projects and tasks that are not there yet.
/// Users match by username, projects by name and tasks by title.
pub async fn seed(state: nikjin_shared::State) -> anyhow::Result<SeedSummary> {
    let user_command = nikjin_user::Command(state.clone());
    let user_query = nikjin_user::Query(state.read_db.clone());
    let project_command = nikjin_project::Command(state.clone());
    let project_query = nikjin_project::Query(state.read_db.clone());
    let task_command = nikjin_task::Command(state.clone());
    let task_query = nikjin_task::Query(state.read_db.clone());

    let mut user_ids = Vec::with_capacity(USERS.len());
    for (username, email, first_name, last_name) in USERS {
        let id = match user_query.find_by_username(username).await? {
            Some(user) => user.id,
            None => {
                let id = user_command
                    .create(CreateUserInput {
                        username: username.to_owned(),
                        first_name: first_name.to_owned(),
                        last_name: last_name.to_owned(),
                        email: email.to_owned(),
                        password: SAMPLE_PASSWORD.to_owned(),
                    })
                    .await?;
                tracing::info!("Created user: {username}");

                id
            }
        };

        user_ids.push(id);
    }

    let now = nikjin_shared::now();

    for project in PROJECTS {
        if project_query.find_by_name(project.name).await?.is_some() {
            continue;
        }

        project_command
            .create(
                ProjectInput {
                    name: project.name.to_owned(),
                    description: project.description.to_owned(),
                    members: project
                        .members
                        .iter()
                        .map(|i| user_ids[*i].to_owned())
                        .collect(),
                    deadline: Some(now + project.deadline_in_days * DAY),
                    is_active: true,
                },
                &user_ids[project.manager],
            )
            .await?;
        tracing::info!("Created project: {}", project.name);
    }

    for task in TASKS {
        if task_query.find_by_title(task.title).await?.is_some() {
            continue;
        }

        task_command
            .create(
                TaskInput {
                    title: task.title.to_owned(),
                    description: task.description.to_owned(),
                    priority: task.priority,
                    status: task.status,
                    assigned_to: Some(user_ids[task.assigned_to].to_owned()),
                    due_date: Some(now + task.due_in_days * DAY),
                },
                &user_ids[task.created_by],
            )
            .await?;
        tracing::info!("Created task: {}", task.title);
    }

    let summary = SeedSummary {
        users: user_query.count().await?,
        projects: project_query.count().await?,
        tasks: task_query.count().await?,
    };

    tracing::info!(
        users = summary.users,
        projects = summary.projects,
        tasks = summary.tasks,
        "sample data ready, every sample user logs in with {SAMPLE_PASSWORD}"
    );

    Ok(summary)
}
