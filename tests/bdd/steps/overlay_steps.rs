use cucumber::{then, when};
use taskboard::dialog::{DialogAction, DialogInput};
use taskboard::models::TaskId;
use taskboard::overlay::{EditForm, OverlayState};

use crate::BoardWorld;
use crate::steps::common_steps::begin_action;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn form_field(world: &mut BoardWorld) -> &mut EditForm {
    world
        .overlay
        .form_mut()
        .expect("no edit form, add 'When I start editing'")
}

/// Feed one input to the open dialog and, if that settled it, carry the
/// answer through to the overlay.
async fn answer_dialog(world: &mut BoardWorld, input: DialogInput) {
    let dialog = world.dialog.as_mut().expect("no confirmation dialog is open");
    if dialog.handle(input).is_none() {
        return;
    }
    let pending = world.pending.take().expect("dialog already answered");
    let confirmed = pending.resolved().await;

    begin_action(world);
    let client = world.client.as_ref().expect("client not set");
    let result = world
        .overlay
        .resolve_delete(confirmed, client, &mut world.view)
        .await;
    if let Err(e) = result {
        world.last_error = Some(e.to_string());
    }
}

// ---------------------------------------------------------------------------
// When
// ---------------------------------------------------------------------------

#[when(expr = "I open task {string}")]
async fn i_open_task(world: &mut BoardWorld, id: String) {
    let client = world.client.as_ref().expect("client not set");
    world.overlay.open(&client.cache(), &TaskId::parse(&id));
}

#[when("I start editing")]
async fn i_start_editing(world: &mut BoardWorld) {
    let client = world.client.as_ref().expect("client not set");
    assert!(
        world.overlay.edit(&client.cache(), &world.contacts),
        "overlay could not switch to editing"
    );
}

#[when(expr = "I change the title to {string}")]
async fn i_change_the_title(world: &mut BoardWorld, title: String) {
    form_field(world).title = title;
}

#[when(expr = "I change the priority to {string}")]
async fn i_change_the_priority(world: &mut BoardWorld, priority: String) {
    form_field(world).priority = priority;
}

#[when(expr = "I change the due date to {string}")]
async fn i_change_the_due_date(world: &mut BoardWorld, due: String) {
    form_field(world).due_date = due;
}

#[when("I save the edit")]
async fn i_save_the_edit(world: &mut BoardWorld) {
    begin_action(world);
    let client = world.client.as_ref().expect("client not set");
    let result = world.overlay.save(client, &mut world.view).await;
    if let Err(e) = result {
        world.last_error = Some(e.to_string());
    }
}

#[when("I cancel the edit")]
async fn i_cancel_the_edit(world: &mut BoardWorld) {
    world.overlay.cancel();
}

#[when("I dismiss the overlay")]
async fn i_dismiss_the_overlay(world: &mut BoardWorld) {
    world.overlay.dismiss();
}

#[when("I ask to delete the task")]
async fn i_ask_to_delete_the_task(world: &mut BoardWorld) {
    let client = world.client.as_ref().expect("client not set");
    let (dialog, pending) = world
        .overlay
        .request_delete(&client.cache())
        .expect("delete can only be requested while viewing a task");
    world.dialog = Some(dialog);
    world.pending = Some(pending);
}

#[when("I confirm the deletion")]
async fn i_confirm_the_deletion(world: &mut BoardWorld) {
    answer_dialog(world, DialogInput::Confirm).await;
}

#[when("I decline the deletion")]
async fn i_decline_the_deletion(world: &mut BoardWorld) {
    answer_dialog(world, DialogInput::Cancel).await;
}

#[when("I press Escape in the dialog")]
async fn i_press_escape(world: &mut BoardWorld) {
    answer_dialog(world, DialogInput::Escape).await;
}

#[when("I press Tab in the dialog")]
async fn i_press_tab(world: &mut BoardWorld) {
    answer_dialog(world, DialogInput::Tab).await;
}

#[when("I press Enter in the dialog")]
async fn i_press_enter(world: &mut BoardWorld) {
    answer_dialog(world, DialogInput::Enter).await;
}

// ---------------------------------------------------------------------------
// Then
// ---------------------------------------------------------------------------

#[then("the overlay is closed")]
async fn the_overlay_is_closed(world: &mut BoardWorld) {
    assert_eq!(world.overlay.state(), &OverlayState::Closed);
}

#[then(expr = "the overlay is viewing task {string}")]
async fn the_overlay_is_viewing(world: &mut BoardWorld, id: String) {
    assert_eq!(
        world.overlay.state(),
        &OverlayState::Viewing(TaskId::parse(&id))
    );
}

#[then(expr = "the overlay is editing task {string}")]
async fn the_overlay_is_editing(world: &mut BoardWorld, id: String) {
    assert_eq!(
        world.overlay.state(),
        &OverlayState::Editing(TaskId::parse(&id))
    );
}

#[then(expr = "the validation message {string} was shown")]
async fn the_validation_message_was_shown(world: &mut BoardWorld, message: String) {
    assert!(
        world.view.validations.contains(&message),
        "validations: {:?}",
        world.view.validations
    );
}

#[then(expr = "the edit form assigns {string}")]
async fn the_edit_form_assigns(world: &mut BoardWorld, names: String) {
    let form = world.overlay.form().expect("no edit form");
    let actual: Vec<&str> = form.assigned_to.iter().map(|a| a.name()).collect();
    let expected: Vec<&str> = names.split(", ").filter(|n| !n.is_empty()).collect();
    assert_eq!(actual, expected);
}

#[then(expr = "the edit form title is {string}")]
async fn the_edit_form_title_is(world: &mut BoardWorld, title: String) {
    assert_eq!(world.overlay.form().expect("no edit form").title, title);
}

#[then("the dialog is still open")]
async fn the_dialog_is_still_open(world: &mut BoardWorld) {
    assert!(world.dialog.as_ref().expect("no dialog").is_open());
}

#[then(expr = "the dialog focuses {string}")]
async fn the_dialog_focuses(world: &mut BoardWorld, button: String) {
    let expected = match button.as_str() {
        "Cancel" => DialogAction::Cancel,
        "Confirm" => DialogAction::Confirm,
        other => panic!("unknown dialog button {other}"),
    };
    assert_eq!(world.dialog.as_ref().expect("no dialog").focus(), expected);
}
