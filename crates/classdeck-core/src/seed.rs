//! Built-in demonstration data.
//!
//! Used when no `data_file` is configured.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::*;
use crate::permissions::{PermissionTree, Role};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn at(y: i32, m: u32, d: u32, hour: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(hour, min, 0).unwrap_or_default()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn courses() -> Vec<Course> {
    let course = |id: &str,
                  en: &str,
                  ru: &str,
                  slug: &str,
                  status: CourseStatus,
                  tech: &[&str],
                  counts: (u32, u32),
                  created: NaiveDate,
                  updated: NaiveDate,
                  version: &str| Course {
        id: id.to_string(),
        title: LocalizedText::new(en, ru),
        slug: slug.to_string(),
        status,
        technologies: strings(tech),
        lessons_count: counts.0,
        students_count: counts.1,
        created_at: created,
        updated_at: updated,
        version: version.to_string(),
    };

    vec![
        course(
            "1",
            "HTML & CSS Fundamentals",
            "Основы HTML и CSS",
            "html-css-fundamentals",
            CourseStatus::Active,
            &["HTML", "CSS"],
            (12, 1543),
            date(2024, 1, 15),
            date(2024, 12, 10),
            "2.1.0",
        ),
        course(
            "2",
            "JavaScript for Beginners",
            "JavaScript для начинающих",
            "javascript-beginners",
            CourseStatus::Active,
            &["JavaScript"],
            (18, 2341),
            date(2024, 2, 1),
            date(2024, 12, 15),
            "3.0.1",
        ),
        course(
            "3",
            "Advanced React",
            "React: Продвинутый уровень",
            "advanced-react",
            CourseStatus::Active,
            &["React", "TypeScript"],
            (24, 892),
            date(2024, 3, 10),
            date(2024, 12, 20),
            "1.5.2",
        ),
        course(
            "4",
            "Backend with Node.js",
            "Backend на Node.js",
            "backend-nodejs",
            CourseStatus::Draft,
            &["Node.js", "Express", "TypeScript"],
            (16, 0),
            date(2024, 12, 1),
            date(2024, 12, 22),
            "0.1.0",
        ),
        course(
            "5",
            "TypeScript: Zero to Hero",
            "TypeScript: От нуля до героя",
            "typescript-zero-hero",
            CourseStatus::Active,
            &["TypeScript"],
            (14, 1205),
            date(2024, 4, 20),
            date(2024, 11, 30),
            "2.0.0",
        ),
    ]
}

pub fn lessons() -> Vec<Lesson> {
    let lesson = |id: &str, en: &str, ru: &str, order, status, tasks_count, duration, created| Lesson {
        id: id.to_string(),
        course_id: "1".to_string(),
        title: LocalizedText::new(en, ru),
        order,
        status,
        tasks_count,
        duration,
        created_at: created,
    };

    vec![
        lesson("l1", "Introduction to HTML", "Введение в HTML", 1, LessonStatus::Active, 5, 45, date(2024, 1, 16)),
        lesson("l2", "Semantic Markup", "Семантическая разметка", 2, LessonStatus::Active, 4, 60, date(2024, 1, 17)),
        lesson("l3", "CSS: Styling Basics", "CSS: Основы стилизации", 3, LessonStatus::Active, 6, 90, date(2024, 1, 18)),
        lesson("l4", "Flexbox Layouts", "Flexbox макеты", 4, LessonStatus::Draft, 3, 75, date(2024, 1, 19)),
    ]
}

pub fn tasks() -> Vec<Task> {
    let task = |id: &str, en: &str, ru: &str, order, validator_status, difficulty, created| Task {
        id: id.to_string(),
        lesson_id: "l1".to_string(),
        title: LocalizedText::new(en, ru),
        task_type: TaskType::Code,
        order,
        status: LessonStatus::Active,
        validator_status,
        difficulty,
        created_at: created,
    };

    vec![
        task(
            "t1",
            "Create a simple HTML page",
            "Создать простую HTML страницу",
            1,
            ValidatorStatus::Configured,
            Difficulty::Easy,
            date(2024, 1, 20),
        ),
        task(
            "t2",
            "Add headings and paragraphs",
            "Добавить заголовки и параграфы",
            2,
            ValidatorStatus::Configured,
            Difficulty::Easy,
            date(2024, 1, 21),
        ),
        task(
            "t3",
            "Working with lists",
            "Работа со списками",
            3,
            ValidatorStatus::Error,
            Difficulty::Medium,
            date(2024, 1, 22),
        ),
    ]
}

pub fn users() -> Vec<User> {
    let user = |id: &str, name: &str, email: &str, role, created, last_login, courses, tasks| User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        avatar: None,
        role,
        status: UserStatus::Active,
        created_at: created,
        last_login_at: last_login,
        courses_enrolled: courses,
        tasks_completed: tasks,
    };

    vec![
        user("u1", "Анна Иванова", "anna.ivanova@example.com", UserRole::Admin, date(2023, 1, 10), date(2024, 12, 23), 0, 0),
        user("u2", "Дмитрий Петров", "dmitry.petrov@example.com", UserRole::Teacher, date(2023, 3, 15), date(2024, 12, 22), 3, 156),
        user("u3", "Мария Смирнова", "maria.smirnova@example.com", UserRole::Student, date(2024, 1, 20), date(2024, 12, 23), 5, 87),
        user("u4", "Алексей Козлов", "alexey.kozlov@example.com", UserRole::Student, date(2024, 2, 10), date(2024, 12, 21), 3, 45),
        user("u5", "Елена Морозова", "elena.morozova@example.com", UserRole::Moderator, date(2023, 6, 5), date(2024, 12, 23), 2, 234),
    ]
}

pub fn activities() -> Vec<Activity> {
    let activity = |id: &str, user_id: &str, user_name: &str, action: &str, resource: &str, timestamp| Activity {
        id: id.to_string(),
        user_id: user_id.to_string(),
        user_name: user_name.to_string(),
        action: action.to_string(),
        resource: resource.to_string(),
        timestamp,
    };

    vec![
        activity("a1", "u2", "Дмитрий Петров", "Создал новый курс", "Backend на Node.js", at(2024, 12, 23, 10, 30)),
        activity("a2", "u3", "Мария Смирнова", "Завершила задачу", "React Hooks: useState", at(2024, 12, 23, 9, 15)),
        activity("a3", "u5", "Елена Морозова", "Одобрила код-ревью", "Task #234", at(2024, 12, 23, 8, 45)),
        activity("a4", "u4", "Алексей Козлов", "Записался на курс", "TypeScript: От нуля до героя", at(2024, 12, 22, 16, 20)),
    ]
}

pub fn reviews() -> Vec<CodeReview> {
    vec![
        CodeReview {
            id: "r1".to_string(),
            task_id: "t1".to_string(),
            task_title: "Create a simple HTML page".to_string(),
            student_id: "u3".to_string(),
            student_name: "Мария Смирнова".to_string(),
            status: ReviewStatus::Pending,
            submitted_at: at(2024, 12, 23, 8, 30),
            reviewed_at: None,
            validation_results: ValidationResults { passed: 8, failed: 2, total: 10 },
        },
        CodeReview {
            id: "r2".to_string(),
            task_id: "t2".to_string(),
            task_title: "Add headings and paragraphs".to_string(),
            student_id: "u4".to_string(),
            student_name: "Алексей Козлов".to_string(),
            status: ReviewStatus::Pending,
            submitted_at: at(2024, 12, 23, 7, 15),
            reviewed_at: None,
            validation_results: ValidationResults { passed: 10, failed: 0, total: 10 },
        },
        CodeReview {
            id: "r3".to_string(),
            task_id: "t3".to_string(),
            task_title: "Working with lists".to_string(),
            student_id: "u3".to_string(),
            student_name: "Мария Смирнова".to_string(),
            status: ReviewStatus::Approved,
            submitted_at: at(2024, 12, 22, 14, 30),
            reviewed_at: Some(at(2024, 12, 22, 15, 45)),
            validation_results: ValidationResults { passed: 12, failed: 0, total: 12 },
        },
    ]
}

/// `[create, read, update, delete]` flags.
fn crud(flags: [bool; 4]) -> [(&'static str, bool); 4] {
    [
        ("create", flags[0]),
        ("read", flags[1]),
        ("update", flags[2]),
        ("delete", flags[3]),
    ]
}

fn role(
    id: &str,
    name: &str,
    description: &str,
    users_count: u32,
    content: [bool; 4],
    users: [bool; 4],
    reviews: [bool; 4],
    statistics: bool,
) -> Role {
    Role {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        users_count,
        permissions: PermissionTree::new()
            .with_resource("courses", crud(content))
            .with_resource("lessons", crud(content))
            .with_resource("tasks", crud(content))
            .with_resource("users", crud(users))
            .with_resource("reviews", crud(reviews))
            .with_resource("statistics", [("read", statistics)]),
    }
}

pub fn roles() -> Vec<Role> {
    const ALL: [bool; 4] = [true; 4];
    const NONE: [bool; 4] = [false; 4];
    const READ: [bool; 4] = [false, true, false, false];
    const CRU: [bool; 4] = [true, true, true, false];
    const RU: [bool; 4] = [false, true, true, false];

    vec![
        role("r1", "Admin", "Full system access", 3, ALL, ALL, ALL, true),
        role("r2", "Teacher", "Create and manage educational content", 15, CRU, READ, CRU, true),
        role("r3", "Student", "Access courses and submit tasks", 2341, READ, NONE, NONE, false),
        role("r4", "Moderator", "Review content and manage users", 8, RU, RU, ALL, true),
    ]
}

pub fn stats() -> PlatformStats {
    const DAILY: [u32; 31] = [
        1240, 1320, 1180, 980, 890, 920, 1050, 1380, 1420, 1350, 1280, 1100, 1020, 1150, 1290,
        1450, 1510, 1480, 1390, 1320, 1250, 1080, 1010, 1170, 1340, 1420, 1380, 1290, 1100, 980,
        1240,
    ];
    let first_day = date(2024, 11, 23);
    let student_activity = DAILY
        .iter()
        .zip(0i64..)
        .map(|(&students, offset)| DailyStudents {
            date: first_day + Duration::days(offset),
            students,
        })
        .collect();

    let share = |name: &str, value, color: &str| CourseShare {
        name: name.to_string(),
        value,
        color: color.to_string(),
    };
    let tech = |tech: &str, success| TechSuccess {
        tech: tech.to_string(),
        success,
    };
    let active = |m, d, dau, wau, mau| ActiveUsers {
        date: date(2024, m, d),
        dau,
        wau,
        mau,
    };
    let completion = |course: &str, started, completed, completion| CourseCompletion {
        course: course.to_string(),
        started,
        completed,
        completion,
    };
    let week = |week: &str, sessions, duration| Engagement {
        week: week.to_string(),
        sessions,
        duration,
    };

    PlatformStats {
        kpis: DashboardKpis {
            courses_count: 24,
            lessons_count: 312,
            tasks_count: 1847,
            students_count: 5234,
            reviews_count: 142,
        },
        student_activity,
        students_by_course: vec![
            share("HTML & CSS", 1543, "#3B82F6"),
            share("JavaScript", 2341, "#10B981"),
            share("React", 892, "#F59E0B"),
            share("TypeScript", 1205, "#8B5CF6"),
            share("Other", 253, "#6B7280"),
        ],
        task_success_by_tech: vec![
            tech("HTML", 92),
            tech("CSS", 85),
            tech("JavaScript", 78),
            tech("TypeScript", 81),
            tech("React", 74),
            tech("Node.js", 69),
        ],
        active_users: vec![
            active(11, 1, 1240, 3450, 12340),
            active(11, 8, 1320, 3580, 12680),
            active(11, 15, 1180, 3420, 12890),
            active(11, 22, 1380, 3780, 13120),
            active(11, 29, 1420, 3890, 13450),
            active(12, 6, 1350, 3720, 13580),
            active(12, 13, 1290, 3650, 13720),
            active(12, 20, 1240, 3590, 13890),
        ],
        course_completion: vec![
            completion("HTML & CSS", 1543, 1205, 78),
            completion("JavaScript", 2341, 1756, 75),
            completion("React", 892, 623, 70),
            completion("TypeScript", 1205, 965, 80),
            completion("Node.js", 543, 325, 60),
        ],
        engagement: vec![
            week("Week 1", 4.2, 45),
            week("Week 2", 4.5, 48),
            week("Week 3", 4.1, 43),
            week("Week 4", 4.8, 52),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_series_covers_a_month() {
        let stats = stats();
        assert_eq!(stats.student_activity.len(), 31);
        assert_eq!(stats.student_activity[0].date, date(2024, 11, 23));
        assert_eq!(stats.student_activity[30].date, date(2024, 12, 23));
    }

    #[test]
    fn roles_differ_where_expected() {
        let roles = roles();
        let student = &roles[2].permissions;
        assert_eq!(student.get("courses", "read"), Some(true));
        assert_eq!(student.get("courses", "update"), Some(false));
        assert_eq!(student.get("statistics", "read"), Some(false));

        let teacher = &roles[1].permissions;
        assert_eq!(teacher.get("reviews", "create"), Some(true));
        assert_eq!(teacher.get("reviews", "delete"), Some(false));
    }
}
