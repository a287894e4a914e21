//! Repository-level CRUD tests against a real Postgres database.

use boxlab_db::models::annotation::{CreateAnnotation, UpdateAnnotation};
use boxlab_db::models::image::CreateImage;
use boxlab_db::models::project::CreateProject;
use boxlab_db::repositories::{AnnotationRepo, ImageRepo, ProjectRepo};
use sqlx::PgPool;

fn project_input(name: &str, classes: &[&str]) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        classes: classes.iter().map(|s| s.to_string()).collect(),
    }
}

fn image_input(project_id: i64, original_name: &str) -> CreateImage {
    CreateImage {
        project_id,
        filename: format!("stored-{original_name}"),
        original_name: original_name.to_string(),
        width: 64,
        height: 48,
    }
}

fn annotation_input(class_id: i64) -> CreateAnnotation {
    CreateAnnotation {
        class_id,
        x_center: 0.5,
        y_center: 0.5,
        width: 0.25,
        height: 0.5,
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_project_derives_positional_classes(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &project_input("P", &["cat", "dog"]))
        .await
        .unwrap();

    let classes = &project.class_definitions.0;
    assert_eq!(classes.len(), 2);
    assert_eq!(classes[0].id, 0);
    assert_eq!(classes[0].name, "cat");
    assert_eq!(classes[0].color, "hsl(0, 70%, 50%)");
    assert_eq!(classes[1].id, 1);
    assert_eq!(classes[1].color, "hsl(137.5, 70%, 50%)");
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_project_name_violates_unique_constraint(pool: PgPool) {
    ProjectRepo::create(&pool, &project_input("Same", &[]))
        .await
        .unwrap();
    let err = ProjectRepo::create(&pool, &project_input("Same", &[]))
        .await
        .unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_projects_name"));
        }
        other => panic!("expected database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn update_classes_renumbers_from_new_positions(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &project_input("P", &["cat", "dog"]))
        .await
        .unwrap();

    let updated = ProjectRepo::update_classes(
        &pool,
        project.id,
        &["dog".to_string(), "bird".to_string(), "cat".to_string()],
    )
    .await
    .unwrap()
    .unwrap();

    let classes = &updated.class_definitions.0;
    assert_eq!(classes[0].name, "dog");
    assert_eq!(classes[0].id, 0);
    assert_eq!(classes[2].name, "cat");
    assert_eq!(classes[2].id, 2);
}

// ---------------------------------------------------------------------------
// Images and annotations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn image_crud_round_trip(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &project_input("P", &[]))
        .await
        .unwrap();

    let image = ImageRepo::create(&pool, &image_input(project.id, "a.png"))
        .await
        .unwrap();
    assert_eq!(image.width, 64);

    let listed = ImageRepo::list_by_project(&pool, project.id).await.unwrap();
    assert_eq!(listed.len(), 1);

    assert!(ImageRepo::delete(&pool, image.id).await.unwrap());
    assert!(ImageRepo::find_by_id(&pool, image.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn annotation_update_replaces_all_fields(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &project_input("P", &["cat", "dog"]))
        .await
        .unwrap();
    let image = ImageRepo::create(&pool, &image_input(project.id, "a.png"))
        .await
        .unwrap();
    let annotation = AnnotationRepo::create(&pool, image.id, &annotation_input(0))
        .await
        .unwrap();

    let updated = AnnotationRepo::update(
        &pool,
        annotation.id,
        &UpdateAnnotation {
            class_id: 1,
            x_center: 0.25,
            y_center: 0.75,
            width: 0.1,
            height: 0.2,
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.class_id, 1);
    assert_eq!(updated.x_center, 0.25);
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_image_cascades_annotations(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &project_input("P", &["cat"]))
        .await
        .unwrap();
    let image = ImageRepo::create(&pool, &image_input(project.id, "a.png"))
        .await
        .unwrap();
    let annotation = AnnotationRepo::create(&pool, image.id, &annotation_input(0))
        .await
        .unwrap();

    assert!(ImageRepo::delete(&pool, image.id).await.unwrap());
    assert!(AnnotationRepo::find_by_id(&pool, annotation.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_by_image_clears_all_annotations(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &project_input("P", &["cat"]))
        .await
        .unwrap();
    let image = ImageRepo::create(&pool, &image_input(project.id, "a.png"))
        .await
        .unwrap();
    AnnotationRepo::create(&pool, image.id, &annotation_input(0))
        .await
        .unwrap();
    AnnotationRepo::create(&pool, image.id, &annotation_input(0))
        .await
        .unwrap();

    let removed = AnnotationRepo::delete_by_image(&pool, image.id).await.unwrap();
    assert_eq!(removed, 2);
    assert!(AnnotationRepo::list_by_image(&pool, image.id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_project_cascades_images(pool: PgPool) {
    let project = ProjectRepo::create(&pool, &project_input("P", &[]))
        .await
        .unwrap();
    let image = ImageRepo::create(&pool, &image_input(project.id, "a.png"))
        .await
        .unwrap();

    assert!(ProjectRepo::delete(&pool, project.id).await.unwrap());
    assert!(ImageRepo::find_by_id(&pool, image.id).await.unwrap().is_none());
}
